use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per zone type; zones are deactivated, never deleted.
        manager
            .create_table(
                Table::create()
                    .table(DeliveryZones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DeliveryZones::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(DeliveryZones::ZoneType)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DeliveryZones::Name).string().not_null())
                    .col(ColumnDef::new(DeliveryZones::Fee).big_integer().not_null())
                    .col(ColumnDef::new(DeliveryZones::EstimatedDays).integer().not_null())
                    .col(
                        ColumnDef::new(DeliveryZones::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DeliveryZones::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryZones::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeliveryAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryAddresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeliveryAddresses::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(DeliveryAddresses::RecipientName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryAddresses::Phone).string().not_null())
                    .col(ColumnDef::new(DeliveryAddresses::City).string().not_null())
                    .col(ColumnDef::new(DeliveryAddresses::PostalCode).string().null())
                    .col(ColumnDef::new(DeliveryAddresses::Country).string().not_null())
                    .col(ColumnDef::new(DeliveryAddresses::ZoneId).uuid().null())
                    .col(
                        ColumnDef::new(DeliveryAddresses::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DeliveryAddresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryAddresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_addresses_zone")
                            .from(DeliveryAddresses::Table, DeliveryAddresses::ZoneId)
                            .to(DeliveryZones::Table, DeliveryZones::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_addresses_user")
                    .table(DeliveryAddresses::Table)
                    .col(DeliveryAddresses::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryAddresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeliveryZones::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeliveryZones {
    Table,
    Id,
    ZoneType,
    Name,
    Fee,
    EstimatedDays,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DeliveryAddresses {
    Table,
    Id,
    UserId,
    RecipientName,
    Phone,
    City,
    PostalCode,
    Country,
    ZoneId,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}
