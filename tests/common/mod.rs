#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use checkout_pricing::{
    clock::FixedClock,
    config::PricingConfig,
    db::run_migrations,
    dto::coupons::CreateCouponRequest,
    entity::coupons::DiscountKind,
    middleware::auth::AuthUser,
    models::{Coupon, OrderSnapshot},
    services::coupon_service,
    state::AppState,
};
use sea_orm::{ConnectOptions, Database};
use uuid::Uuid;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Fresh in-memory database, migrated, with a clock frozen at [`start`].
pub async fn setup_state() -> anyhow::Result<(AppState, Arc<FixedClock>)> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // Every connection to :memory: is its own database, so keep exactly one.
    options.max_connections(1).min_connections(1);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    let clock = Arc::new(FixedClock::new(start()));
    let state = AppState::new(orm, PricingConfig::default(), "test-secret").with_clock(clock.clone());
    Ok((state, clock))
}

pub fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    }
}

pub fn customer() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        role: "user".into(),
    }
}

pub fn coupon_request(code: &str, kind: DiscountKind, value: i64) -> CreateCouponRequest {
    CreateCouponRequest {
        code: code.into(),
        discount_kind: kind,
        discount_value: value,
        min_order_amount: 0,
        max_discount_amount: None,
        max_uses: 100,
        max_uses_per_user: 1,
        valid_from: start() - Duration::days(1),
        valid_until: start() + Duration::days(30),
        product_ids: vec![],
        category_ids: vec![],
        user_ids: vec![],
    }
}

pub async fn create_coupon(state: &AppState, payload: CreateCouponRequest) -> anyhow::Result<Coupon> {
    Ok(coupon_service::create_coupon(state, &admin(), payload).await?)
}

pub fn order(subtotal: i64) -> OrderSnapshot {
    OrderSnapshot {
        order_id: Uuid::new_v4(),
        subtotal,
        lines: vec![],
    }
}

pub async fn used_count(state: &AppState, code: &str) -> anyhow::Result<i32> {
    let coupon = coupon_service::find_coupon(&state.orm, code)
        .await?
        .expect("coupon exists");
    Ok(coupon.used_count)
}
