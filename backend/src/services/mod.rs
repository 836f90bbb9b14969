//! Business logic services for the stock ledger

pub mod alerts;
pub mod category;
pub mod dashboard;
pub mod inventory;

pub use alerts::{AlertAction, AlertService};
pub use category::CategoryService;
pub use dashboard::DashboardService;
pub use inventory::InventoryService;

use shared::CallerIdentity;

use crate::error::{AppError, AppResult};

/// Item and category changes are reserved for administrators
pub(crate) fn require_admin(caller: &CallerIdentity) -> AppResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}
