//! Shared fixtures for backend integration tests

#![allow(dead_code)]

use shared::{CallerIdentity, Category, CreateCategoryRequest, Item, NewItem, UserRole};
use sqlx::SqlitePool;
use uuid::Uuid;

use stock_ledger::config::{Config, DatabaseConfig};
use stock_ledger::db;
use stock_ledger::services::{CategoryService, InventoryService};

/// Fresh in-memory database with the schema applied
pub async fn memory_pool() -> SqlitePool {
    db::connect(&Config::for_testing().database)
        .await
        .expect("in-memory database")
}

/// On-disk database in WAL mode with several connections, for concurrency tests
pub async fn file_pool(dir: &tempfile::TempDir, max_connections: u32) -> SqlitePool {
    let path = dir.path().join("ledger.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", path.display()),
        max_connections,
        min_connections: 1,
        busy_timeout_ms: 30_000,
        run_migrations: true,
    };
    db::connect(&config).await.expect("file database")
}

pub fn admin(organization_id: Uuid) -> CallerIdentity {
    CallerIdentity::new(Uuid::new_v4(), organization_id, UserRole::Admin)
}

pub fn user(organization_id: Uuid) -> CallerIdentity {
    CallerIdentity::new(Uuid::new_v4(), organization_id, UserRole::User)
}

pub async fn create_category(pool: &SqlitePool, caller: &CallerIdentity, name: &str) -> Category {
    CategoryService::new(pool.clone())
        .create_category(
            caller,
            CreateCategoryRequest {
                name: name.to_string(),
                description: None,
                color: None,
            },
        )
        .await
        .expect("create category")
}

pub fn new_item(category_id: Uuid, unit: &str, current_stock: i64, minimum_threshold: i64) -> NewItem {
    NewItem {
        category_id,
        name: format!("Item {}", &Uuid::new_v4().simple().to_string()[..8]),
        sku: None,
        unit_of_measurement: unit.to_string(),
        minimum_threshold,
        current_stock,
        unit_cost: None,
        track_stock: true,
    }
}

/// Category plus one item in it
pub async fn create_item(
    pool: &SqlitePool,
    caller: &CallerIdentity,
    current_stock: i64,
    minimum_threshold: i64,
) -> Item {
    let category = create_category(pool, caller, "General").await;
    InventoryService::new(pool.clone())
        .create_item(caller, new_item(category.id, "pcs", current_stock, minimum_threshold))
        .await
        .expect("create item")
}
