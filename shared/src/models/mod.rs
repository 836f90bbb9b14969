//! Domain models for the stock ledger

mod alert;
mod category;
mod item;
mod movement;
mod user;

pub use alert::*;
pub use category::*;
pub use item::*;
pub use movement::*;
pub use user::*;
