mod common;

use chrono::{Duration, NaiveDate};
use checkout_pricing::{
    clock::Clock,
    dto::delivery::UpdateZoneRequest,
    entity::{DeliveryZones, delivery_zones::ZoneType},
    error::AppError,
    services::delivery_service,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use tokio::task::JoinSet;

use common::{admin, customer, setup_state};

#[tokio::test]
async fn empty_zone_table_heals_itself_on_first_quote() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;

    let quote = delivery_service::resolve(&state, "Cocody", None).await?;
    assert_eq!(quote.zone.zone_type, ZoneType::OtherDomestic);
    assert_eq!(quote.fee, state.pricing.default_zone_fee);
    assert_eq!(quote.estimated_days, state.pricing.default_zone_days);
    assert_eq!(DeliveryZones::find().count(&state.orm).await?, 1);

    // The created zone is reused, not duplicated.
    delivery_service::resolve(&state, "Nowhere", None).await?;
    assert_eq!(DeliveryZones::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_first_quotes_create_one_default_zone() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let state = state.clone();
        tasks.spawn(async move { delivery_service::resolve(&state, "Korhogo", None).await });
    }
    while let Some(joined) = tasks.join_next().await {
        let quote = joined??;
        assert_eq!(quote.zone.zone_type, ZoneType::OtherDomestic);
    }

    assert_eq!(DeliveryZones::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn seeded_cities_resolve_case_and_whitespace_insensitively() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    assert_eq!(delivery_service::seed_default_zones(&state).await?, 4);
    assert_eq!(delivery_service::seed_default_zones(&state).await?, 0);

    let abidjan = delivery_service::resolve(&state, "  COCODY ", None).await?;
    assert_eq!(abidjan.zone.zone_type, ZoneType::Abidjan);
    assert_eq!(abidjan.fee, 1500);

    let bassam = delivery_service::resolve(&state, "grand-bassam", Some("Côte d'Ivoire")).await?;
    assert_eq!(bassam.zone.zone_type, ZoneType::GrandBassam);

    let unknown = delivery_service::resolve(&state, "Tiassalé", None).await?;
    assert_eq!(unknown.zone.zone_type, ZoneType::OtherDomestic);

    let abroad = delivery_service::resolve(&state, "Abidjan", Some("France")).await?;
    assert_eq!(abroad.zone.zone_type, ZoneType::International);
    Ok(())
}

#[tokio::test]
async fn estimated_date_is_today_plus_transit_days() -> anyhow::Result<()> {
    let (state, clock) = setup_state().await?;
    delivery_service::seed_default_zones(&state).await?;

    for (city, days) in [("Yopougon", 1), ("Bassam", 2), ("Daloa", 3), ("Dakar", 7)] {
        let quote = delivery_service::resolve(&state, city, None).await?;
        assert_eq!(quote.estimated_days, days, "{city}");
        assert_eq!(
            quote.estimated_date,
            clock.today() + Duration::days(i64::from(days)),
            "{city}"
        );
    }

    clock.set(
        NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap()
            .and_utc(),
    );
    let quote = delivery_service::resolve(&state, "Dakar", None).await?;
    assert_eq!(quote.estimated_date, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
    Ok(())
}

#[tokio::test]
async fn deactivated_zone_falls_back_to_other_domestic() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    delivery_service::seed_default_zones(&state).await?;

    delivery_service::update_zone(
        &state,
        &admin(),
        ZoneType::Abidjan,
        UpdateZoneRequest {
            name: None,
            fee: None,
            estimated_days: None,
            is_active: Some(false),
        },
    )
    .await?;

    let quote = delivery_service::resolve(&state, "Plateau", None).await?;
    assert_eq!(quote.zone.zone_type, ZoneType::OtherDomestic);
    // Deactivation keeps the row.
    assert_eq!(DeliveryZones::find().count(&state.orm).await?, 4);
    Ok(())
}

#[tokio::test]
async fn only_staff_change_zone_fees() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    delivery_service::seed_default_zones(&state).await?;

    let change = || UpdateZoneRequest {
        name: None,
        fee: Some(2000),
        estimated_days: Some(2),
        is_active: None,
    };

    let denied = delivery_service::update_zone(&state, &customer(), ZoneType::Abidjan, change()).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let bad = delivery_service::update_zone(
        &state,
        &admin(),
        ZoneType::Abidjan,
        UpdateZoneRequest {
            name: None,
            fee: Some(-1),
            estimated_days: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));

    let zone = delivery_service::update_zone(&state, &admin(), ZoneType::Abidjan, change()).await?;
    assert_eq!(zone.fee, 2000);

    let quote = delivery_service::resolve(&state, "Marcory", None).await?;
    assert_eq!(quote.fee, 2000);
    assert_eq!(quote.estimated_days, 2);
    Ok(())
}
