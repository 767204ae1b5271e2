use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Coupons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Coupons::Code).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Coupons::DiscountKind).string_len(32).not_null())
                    .col(ColumnDef::new(Coupons::DiscountValue).big_integer().not_null())
                    .col(
                        ColumnDef::new(Coupons::MinOrderAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Coupons::MaxDiscountAmount).big_integer().null())
                    .col(ColumnDef::new(Coupons::MaxUses).integer().not_null())
                    .col(
                        ColumnDef::new(Coupons::UsedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Coupons::MaxUsesPerUser).integer().not_null())
                    .col(
                        ColumnDef::new(Coupons::ValidFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coupons::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Coupons::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(Coupons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Coupons::UsedCount).lte(Expr::col(Coupons::MaxUses)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(scope_table(CouponProducts::Table, CouponProducts::ProductId))
            .await?;
        manager
            .create_table(scope_table(CouponCategories::Table, CouponCategories::CategoryId))
            .await?;
        manager
            .create_table(scope_table(CouponUsers::Table, CouponUsers::UserId))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CouponUsages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CouponUsages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CouponUsages::CouponId).uuid().not_null())
                    .col(ColumnDef::new(CouponUsages::UserId).uuid().not_null())
                    .col(ColumnDef::new(CouponUsages::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(CouponUsages::DiscountAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CouponUsages::UsedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coupon_usages_coupon")
                            .from(CouponUsages::Table, CouponUsages::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // An order can carry a given coupon at most once.
        manager
            .create_index(
                Index::create()
                    .name("uq_coupon_usages_coupon_order")
                    .table(CouponUsages::Table)
                    .col(CouponUsages::CouponId)
                    .col(CouponUsages::OrderId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coupon_usages_coupon_user")
                    .table(CouponUsages::Table)
                    .col(CouponUsages::CouponId)
                    .col(CouponUsages::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CouponUsages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CouponUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CouponCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CouponProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await
    }
}

/// Join table narrowing a coupon to a set of ids; empty means unrestricted.
fn scope_table<T, C>(table: T, member: C) -> TableCreateStatement
where
    T: IntoIden + Copy + 'static,
    C: IntoIden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(ScopeColumn::CouponId).uuid().not_null())
        .col(ColumnDef::new(member).uuid().not_null())
        .primary_key(Index::create().col(ScopeColumn::CouponId).col(member))
        .foreign_key(
            ForeignKey::create()
                .from(table, ScopeColumn::CouponId)
                .to(Coupons::Table, Coupons::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    DiscountKind,
    DiscountValue,
    MinOrderAmount,
    MaxDiscountAmount,
    MaxUses,
    UsedCount,
    MaxUsesPerUser,
    ValidFrom,
    ValidUntil,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ScopeColumn {
    CouponId,
}

#[derive(DeriveIden, Clone, Copy)]
enum CouponProducts {
    Table,
    ProductId,
}

#[derive(DeriveIden, Clone, Copy)]
enum CouponCategories {
    Table,
    CategoryId,
}

#[derive(DeriveIden, Clone, Copy)]
enum CouponUsers {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum CouponUsages {
    Table,
    Id,
    CouponId,
    UserId,
    OrderId,
    DiscountAmount,
    UsedAt,
}
