pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_delivery_tables;
mod m20250101_000002_create_coupon_tables;
mod m20250101_000003_unique_default_address;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_delivery_tables::Migration),
            Box::new(m20250101_000002_create_coupon_tables::Migration),
            Box::new(m20250101_000003_unique_default_address::Migration),
        ]
    }
}
