mod common;

use std::{sync::Arc, time::Duration};

use checkout_pricing::{
    clock::FixedClock,
    config::PricingConfig,
    db::run_migrations,
    dto::addresses::SaveAddressRequest,
    entity::{CouponUsages, coupon_usages::Column as UsageCol, coupons::DiscountKind},
    pricing::coupons::CouponValidation,
    services::{
        address_service,
        coupon_service::{self, ApplyOutcome},
    },
    state::AppState,
};
use sea_orm::{ColumnTrait, ConnectOptions, Database, EntityTrait, PaginatorTrait, QueryFilter};
use tokio::task::JoinSet;
use uuid::Uuid;

use common::{coupon_request, create_coupon, customer, order, start, used_count};

// Runs against a real Postgres so concurrent transactions actually overlap.
// Skipped when no database is configured.
async fn setup_pg_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL to run Postgres contention tests.");
            return Ok(None);
        }
    };

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(30));
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    let state = AppState::new(orm, PricingConfig::default(), "test-secret")
        .with_clock(Arc::new(FixedClock::new(start())));
    Ok(Some(state))
}

fn unique_code(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

#[tokio::test]
async fn concurrent_applies_stop_exactly_at_max_uses() -> anyhow::Result<()> {
    let Some(state) = setup_pg_state().await? else {
        return Ok(());
    };

    const MAX_USES: i32 = 3;
    const APPLIERS: usize = 12;

    let code = unique_code("RUSH");
    let mut payload = coupon_request(&code, DiscountKind::Fixed, 1000);
    payload.max_uses = MAX_USES;
    let coupon = create_coupon(&state, payload).await?;

    let mut tasks = JoinSet::new();
    for _ in 0..APPLIERS {
        let state = state.clone();
        let code = coupon.code.clone();
        tasks.spawn(async move {
            coupon_service::apply(&state, &customer(), &code, &order(10_000)).await
        });
    }

    let mut applied = 0;
    let mut rejected = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined?? {
            ApplyOutcome::Applied(_) => applied += 1,
            ApplyOutcome::Rejected(reason) => {
                assert_eq!(reason, CouponValidation::UsageLimitReached);
                rejected += 1;
            }
        }
    }

    assert_eq!(applied, MAX_USES);
    assert_eq!(rejected, APPLIERS - MAX_USES as usize);
    assert_eq!(used_count(&state, &coupon.code).await?, MAX_USES);

    let usages = CouponUsages::find()
        .filter(UsageCol::CouponId.eq(coupon.id))
        .count(&state.orm)
        .await?;
    assert_eq!(usages, MAX_USES as u64);
    Ok(())
}

#[tokio::test]
async fn concurrent_applies_to_one_order_record_one_usage() -> anyhow::Result<()> {
    let Some(state) = setup_pg_state().await? else {
        return Ok(());
    };

    let code = unique_code("SAME");
    let mut payload = coupon_request(&code, DiscountKind::Fixed, 1000);
    payload.max_uses_per_user = 10;
    let coupon = create_coupon(&state, payload).await?;

    let user = customer();
    let snapshot = order(10_000);
    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let state = state.clone();
        let user = user.clone();
        let snapshot = snapshot.clone();
        let code = coupon.code.clone();
        tasks.spawn(async move { coupon_service::apply(&state, &user, &code, &snapshot).await });
    }

    let mut applied = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined?? {
            ApplyOutcome::Applied(_) => applied += 1,
            ApplyOutcome::Rejected(reason) => {
                assert_eq!(reason, CouponValidation::AlreadyAppliedToOrder)
            }
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(used_count(&state, &coupon.code).await?, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_first_addresses_keep_one_default() -> anyhow::Result<()> {
    let Some(state) = setup_pg_state().await? else {
        return Ok(());
    };

    let user = customer();
    let mut tasks = JoinSet::new();
    for city in ["Cocody", "Marcory", "Yopougon", "Treichville", "Bouaké", "Bassam"] {
        let state = state.clone();
        let user = user.clone();
        tasks.spawn(async move {
            let payload = SaveAddressRequest {
                recipient_name: "Awa Koné".into(),
                phone: "+225 07 00 00 00".into(),
                city: city.into(),
                postal_code: None,
                country: None,
                is_default: false,
            };
            address_service::save_address(&state, &user, payload).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined??;
    }

    let listed = address_service::list_addresses(&state, &user).await?;
    assert_eq!(listed.len(), 6);
    assert_eq!(listed.iter().filter(|a| a.is_default).count(), 1);
    Ok(())
}
