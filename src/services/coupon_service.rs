use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, LockType},
};
use uuid::Uuid;

use crate::{
    db::is_unique_violation,
    dto::coupons::{AppliedCoupon, CreateCouponRequest},
    entity::{
        coupon_categories::{
            ActiveModel as CouponCategoryActive, Column as CouponCategoryCol,
            Entity as CouponCategories,
        },
        coupon_products::{
            ActiveModel as CouponProductActive, Column as CouponProductCol, Entity as CouponProducts,
        },
        coupon_usages::{ActiveModel as UsageActive, Column as UsageCol, Entity as CouponUsages},
        coupon_users::{
            ActiveModel as CouponUserActive, Column as CouponUserCol, Entity as CouponUsers,
        },
        coupons::{
            ActiveModel as CouponActive, Column as CouponCol, DiscountKind, Entity as Coupons,
            Model as CouponModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Coupon, OrderLine, OrderSnapshot, coupon_from_entity, usage_from_entity},
    pricing::coupons::{
        CouponValidation, UserUsage, calculate_discount, eligible_amount, validate_coupon,
    },
    state::AppState,
};

/// Result of checking a code without committing anything.
#[derive(Debug, Clone)]
pub struct CouponCheck {
    pub validation: CouponValidation,
    pub coupon: Option<Coupon>,
    /// Discount for the given amount; zero unless the coupon is valid.
    pub discount: i64,
}

impl CouponCheck {
    pub fn free_shipping(&self) -> bool {
        self.validation.is_valid()
            && self
                .coupon
                .as_ref()
                .is_some_and(|c| c.discount_kind == DiscountKind::FreeShipping)
    }
}

#[derive(Debug, Clone)]
pub enum ApplyOutcome {
    Applied(AppliedCoupon),
    Rejected(CouponValidation),
}

/// Codes are stored upper-case without surrounding whitespace.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub async fn find_coupon<C: ConnectionTrait>(db: &C, code: &str) -> AppResult<Option<Coupon>> {
    let model = Coupons::find()
        .filter(CouponCol::Code.eq(normalize_code(code)))
        .one(db)
        .await?;
    match model {
        Some(model) => Ok(Some(with_scopes(db, model).await?)),
        None => Ok(None),
    }
}

async fn with_scopes<C: ConnectionTrait>(db: &C, model: CouponModel) -> AppResult<Coupon> {
    let product_ids = CouponProducts::find()
        .filter(CouponProductCol::CouponId.eq(model.id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.product_id)
        .collect();
    let category_ids = CouponCategories::find()
        .filter(CouponCategoryCol::CouponId.eq(model.id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.category_id)
        .collect();
    let user_ids = CouponUsers::find()
        .filter(CouponUserCol::CouponId.eq(model.id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.user_id)
        .collect();
    Ok(coupon_from_entity(model, product_ids, category_ids, user_ids))
}

async fn count_user_uses<C: ConnectionTrait>(db: &C, coupon_id: Uuid, user_id: Uuid) -> AppResult<u64> {
    let uses = CouponUsages::find()
        .filter(UsageCol::CouponId.eq(coupon_id))
        .filter(UsageCol::UserId.eq(user_id))
        .count(db)
        .await?;
    Ok(uses)
}

/// Checks `code` for `user` and, when given, the order amount and lines.
pub async fn check(
    state: &AppState,
    code: &str,
    user: Option<&AuthUser>,
    order_amount: Option<i64>,
    lines: &[OrderLine],
) -> AppResult<CouponCheck> {
    let Some(coupon) = find_coupon(&state.orm, code).await? else {
        return Ok(CouponCheck {
            validation: CouponValidation::NotFound,
            coupon: None,
            discount: 0,
        });
    };

    let usage = match user {
        Some(user) => Some(UserUsage {
            user_id: user.user_id,
            prior_uses: count_user_uses(&state.orm, coupon.id, user.user_id).await?,
        }),
        None => None,
    };

    let validation = validate_coupon(&coupon, state.clock.now(), usage, order_amount, lines);
    let discount = match order_amount {
        Some(amount) if validation.is_valid() => {
            calculate_discount(&coupon, eligible_amount(&coupon, amount, lines))
        }
        _ => 0,
    };
    if !validation.is_valid() {
        tracing::debug!(code = %coupon.code, reason = %validation, "coupon rejected");
    }

    Ok(CouponCheck {
        validation,
        coupon: Some(coupon),
        discount,
    })
}

pub async fn validate(
    state: &AppState,
    code: &str,
    user: Option<&AuthUser>,
    order_amount: Option<i64>,
) -> AppResult<CouponValidation> {
    Ok(check(state, code, user, order_amount, &[]).await?.validation)
}

/// Commits `code` against `order` for `user`.
///
/// Re-validates as of now, records the usage and bumps the counter in one
/// transaction. The counter only moves while it is below `max_uses`, and the
/// (coupon, order) pair is unique, so concurrent callers can neither exceed the
/// cap nor apply the coupon twice to one order. Rejections leave no trace.
pub async fn apply(
    state: &AppState,
    user: &AuthUser,
    code: &str,
    order: &OrderSnapshot,
) -> AppResult<ApplyOutcome> {
    let now = state.clock.now();
    let txn = state.orm.begin().await?;

    let model = Coupons::find()
        .filter(CouponCol::Code.eq(normalize_code(code)))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let Some(model) = model else {
        return Ok(ApplyOutcome::Rejected(CouponValidation::NotFound));
    };
    let coupon = with_scopes(&txn, model).await?;

    let already_applied = CouponUsages::find()
        .filter(UsageCol::CouponId.eq(coupon.id))
        .filter(UsageCol::OrderId.eq(order.order_id))
        .count(&txn)
        .await?;
    if already_applied > 0 {
        return Ok(ApplyOutcome::Rejected(CouponValidation::AlreadyAppliedToOrder));
    }

    let usage = UserUsage {
        user_id: user.user_id,
        prior_uses: count_user_uses(&txn, coupon.id, user.user_id).await?,
    };
    let validation = validate_coupon(&coupon, now, Some(usage), Some(order.subtotal), &order.lines);
    if !validation.is_valid() {
        tracing::debug!(code = %coupon.code, order_id = %order.order_id, reason = %validation, "coupon not applied");
        return Ok(ApplyOutcome::Rejected(validation));
    }

    let discount = calculate_discount(&coupon, eligible_amount(&coupon, order.subtotal, &order.lines));

    let inserted = UsageActive {
        id: Set(Uuid::new_v4()),
        coupon_id: Set(coupon.id),
        user_id: Set(user.user_id),
        order_id: Set(order.order_id),
        discount_amount: Set(discount),
        used_at: Set(now.into()),
    }
    .insert(&txn)
    .await;
    let usage = match inserted {
        Ok(usage) => usage,
        Err(err) if is_unique_violation(&err) => {
            return Ok(ApplyOutcome::Rejected(CouponValidation::AlreadyAppliedToOrder));
        }
        Err(err) => return Err(AppError::UsageNotPersisted(err)),
    };

    let bumped = Coupons::update_many()
        .col_expr(CouponCol::UsedCount, Expr::col(CouponCol::UsedCount).add(1))
        .filter(CouponCol::Id.eq(coupon.id))
        .filter(Expr::col(CouponCol::UsedCount).lt(Expr::col(CouponCol::MaxUses)))
        .exec(&txn)
        .await
        .map_err(AppError::UsageNotPersisted)?;
    if bumped.rows_affected == 0 {
        return Ok(ApplyOutcome::Rejected(CouponValidation::UsageLimitReached));
    }

    txn.commit().await.map_err(AppError::UsageNotPersisted)?;

    tracing::info!(
        code = %coupon.code,
        user_id = %user.user_id,
        order_id = %order.order_id,
        discount,
        "coupon applied"
    );

    Ok(ApplyOutcome::Applied(AppliedCoupon {
        code: coupon.code,
        discount_kind: coupon.discount_kind,
        discount_amount: discount,
        free_shipping: coupon.discount_kind == DiscountKind::FreeShipping,
        usage: usage_from_entity(usage),
    }))
}

pub async fn create_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCouponRequest,
) -> AppResult<Coupon> {
    ensure_admin(user)?;
    let code = normalize_code(&payload.code);
    validate_new_coupon(&code, &payload)?;

    if find_coupon(&state.orm, &code).await?.is_some() {
        return Err(AppError::BadRequest("Coupon code already exists".into()));
    }

    let now = state.clock.now();
    let txn = state.orm.begin().await?;

    let inserted = CouponActive {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        discount_kind: Set(payload.discount_kind),
        discount_value: Set(payload.discount_value),
        min_order_amount: Set(payload.min_order_amount),
        max_discount_amount: Set(match payload.discount_kind {
            DiscountKind::Percentage => payload.max_discount_amount,
            _ => None,
        }),
        max_uses: Set(payload.max_uses),
        used_count: Set(0),
        max_uses_per_user: Set(payload.max_uses_per_user),
        valid_from: Set(payload.valid_from.into()),
        valid_until: Set(payload.valid_until.into()),
        is_active: Set(true),
        created_by: Set(Some(user.user_id)),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await;
    let model = match inserted {
        Ok(model) => model,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::BadRequest("Coupon code already exists".into()));
        }
        Err(err) => return Err(err.into()),
    };

    let product_ids = dedup(payload.product_ids);
    let category_ids = dedup(payload.category_ids);
    let user_ids = dedup(payload.user_ids);

    if !product_ids.is_empty() {
        CouponProducts::insert_many(product_ids.iter().map(|id| CouponProductActive {
            coupon_id: Set(model.id),
            product_id: Set(*id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }
    if !category_ids.is_empty() {
        CouponCategories::insert_many(category_ids.iter().map(|id| CouponCategoryActive {
            coupon_id: Set(model.id),
            category_id: Set(*id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }
    if !user_ids.is_empty() {
        CouponUsers::insert_many(user_ids.iter().map(|id| CouponUserActive {
            coupon_id: Set(model.id),
            user_id: Set(*id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }

    txn.commit().await?;

    tracing::info!(code = %model.code, user_id = %user.user_id, "coupon created");
    Ok(coupon_from_entity(model, product_ids, category_ids, user_ids))
}

fn validate_new_coupon(code: &str, payload: &CreateCouponRequest) -> AppResult<()> {
    if code.is_empty() {
        return Err(AppError::BadRequest("code must not be empty".into()));
    }
    if code.len() > 64 {
        return Err(AppError::BadRequest("code must be at most 64 characters".into()));
    }
    match payload.discount_kind {
        DiscountKind::Percentage if !(1..=100).contains(&payload.discount_value) => {
            return Err(AppError::BadRequest(
                "percentage discount must be between 1 and 100".into(),
            ));
        }
        DiscountKind::Fixed if payload.discount_value <= 0 => {
            return Err(AppError::BadRequest("fixed discount must be positive".into()));
        }
        DiscountKind::FreeShipping if payload.discount_value < 0 => {
            return Err(AppError::BadRequest("discount_value must not be negative".into()));
        }
        _ => {}
    }
    if payload.min_order_amount < 0 {
        return Err(AppError::BadRequest("min_order_amount must not be negative".into()));
    }
    if payload.max_discount_amount.is_some_and(|cap| cap <= 0) {
        return Err(AppError::BadRequest("max_discount_amount must be positive".into()));
    }
    if payload.max_uses < 1 || payload.max_uses_per_user < 1 {
        return Err(AppError::BadRequest("usage limits must be at least 1".into()));
    }
    if payload.valid_from > payload.valid_until {
        return Err(AppError::BadRequest("valid_from must not be after valid_until".into()));
    }
    Ok(())
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids.dedup();
    ids
}

pub async fn deactivate_coupon(state: &AppState, user: &AuthUser, code: &str) -> AppResult<Coupon> {
    ensure_admin(user)?;
    let model = Coupons::find()
        .filter(CouponCol::Code.eq(normalize_code(code)))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CouponActive = model.into();
    active.is_active = Set(false);
    let model = active.update(&state.orm).await?;

    tracing::info!(code = %model.code, user_id = %user.user_id, "coupon deactivated");
    with_scopes(&state.orm, model).await
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn request(kind: DiscountKind, value: i64) -> CreateCouponRequest {
        CreateCouponRequest {
            code: "summer".into(),
            discount_kind: kind,
            discount_value: value,
            min_order_amount: 0,
            max_discount_amount: None,
            max_uses: 100,
            max_uses_per_user: 1,
            valid_from: Utc::now(),
            valid_until: Utc::now() + Duration::days(7),
            product_ids: vec![],
            category_ids: vec![],
            user_ids: vec![],
        }
    }

    #[test]
    fn codes_are_trimmed_and_upper_cased() {
        assert_eq!(normalize_code("  welcome10 "), "WELCOME10");
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        assert!(validate_new_coupon("SUMMER", &request(DiscountKind::Percentage, 0)).is_err());
        assert!(validate_new_coupon("SUMMER", &request(DiscountKind::Percentage, 101)).is_err());
        assert!(validate_new_coupon("SUMMER", &request(DiscountKind::Percentage, 100)).is_ok());
    }

    #[test]
    fn rejects_inverted_window_and_zero_caps() {
        let mut inverted = request(DiscountKind::Fixed, 5000);
        inverted.valid_until = inverted.valid_from - Duration::seconds(1);
        assert!(validate_new_coupon("SUMMER", &inverted).is_err());

        let mut no_uses = request(DiscountKind::Fixed, 5000);
        no_uses.max_uses = 0;
        assert!(validate_new_coupon("SUMMER", &no_uses).is_err());

        assert!(validate_new_coupon("", &request(DiscountKind::Fixed, 5000)).is_err());
    }

    #[test]
    fn scope_ids_are_deduplicated() {
        let id = Uuid::new_v4();
        assert_eq!(dedup(vec![id, id]), vec![id]);
    }
}
