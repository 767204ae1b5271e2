use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Partial index: at most one default address per user. Same syntax on Postgres and SQLite.
const CREATE: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uq_delivery_addresses_user_default \
                      ON delivery_addresses (user_id) WHERE is_default";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(CREATE).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uq_delivery_addresses_user_default")
            .await?;
        Ok(())
    }
}
