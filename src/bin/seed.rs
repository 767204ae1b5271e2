use chrono::{Duration, Utc};
use checkout_pricing::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::coupons::CreateCouponRequest,
    entity::coupons::DiscountKind,
    error::AppError,
    middleware::auth::AuthUser,
    services::{coupon_service, delivery_service},
    state::AppState,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,checkout_pricing=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let state = AppState::new(orm, config.pricing.clone(), &config.jwt_secret);

    let created = delivery_service::seed_default_zones(&state).await?;
    tracing::info!(created, "delivery zones seeded");

    seed_welcome_coupon(&state).await?;
    Ok(())
}

async fn seed_welcome_coupon(state: &AppState) -> anyhow::Result<()> {
    let staff = AuthUser {
        user_id: Uuid::nil(),
        role: "admin".into(),
    };
    let now = Utc::now();
    let payload = CreateCouponRequest {
        code: "BIENVENUE10".into(),
        discount_kind: DiscountKind::Percentage,
        discount_value: 10,
        min_order_amount: 10_000,
        max_discount_amount: Some(5_000),
        max_uses: 1_000,
        max_uses_per_user: 1,
        valid_from: now,
        valid_until: now + Duration::days(90),
        product_ids: vec![],
        category_ids: vec![],
        user_ids: vec![],
    };

    match coupon_service::create_coupon(state, &staff, payload).await {
        Ok(coupon) => tracing::info!(code = %coupon.code, "seeded welcome coupon"),
        Err(AppError::BadRequest(reason)) => tracing::info!(%reason, "welcome coupon not seeded"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
