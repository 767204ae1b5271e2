use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Iterable, QueryFilter, QueryOrder,
    Set, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    config::PricingConfig,
    dto::delivery::UpdateZoneRequest,
    entity::delivery_zones::{
        ActiveModel as ZoneActive, Column as ZoneCol, Entity as DeliveryZones, Model as ZoneModel,
        ZoneType,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{DeliveryQuote, DeliveryZone, zone_from_entity},
    pricing::zones::{estimated_delivery_date, lookup_city, seed_defaults, zone_type_for},
    state::AppState,
};

/// Prices a delivery to `city`. Always produces a quote: unknown cities and
/// missing zones degrade to the default zone, creating it if the table is empty.
pub async fn resolve(
    state: &AppState,
    city: &str,
    country: Option<&str>,
) -> AppResult<DeliveryQuote> {
    let home = state.pricing.home_country.as_str();
    let country = country.unwrap_or(home);
    let zone_type = zone_type_for(city, country, &state.pricing);
    if zone_type == ZoneType::OtherDomestic && lookup_city(city).is_none() {
        tracing::warn!(city = %city, country = %country, "city not in delivery table, priced as other_domestic");
    }

    let zone = zone_for_type(&state.orm, &state.pricing, zone_type, state.clock.now()).await?;
    Ok(quote_from_zone(zone, state.clock.today()))
}

pub fn quote_from_zone(zone: ZoneModel, today: chrono::NaiveDate) -> DeliveryQuote {
    let estimated_date = estimated_delivery_date(today, zone.estimated_days);
    DeliveryQuote {
        fee: zone.fee,
        estimated_days: zone.estimated_days,
        estimated_date,
        zone: zone_from_entity(zone),
    }
}

/// Active zone for `zone_type`, else the active `other_domestic` zone, else the
/// default zone (created if missing).
pub async fn zone_for_type<C: ConnectionTrait>(
    db: &C,
    config: &PricingConfig,
    zone_type: ZoneType,
    now: DateTime<Utc>,
) -> AppResult<ZoneModel> {
    if let Some(zone) = find_active(db, zone_type).await? {
        return Ok(zone);
    }

    if zone_type != ZoneType::OtherDomestic {
        tracing::warn!(zone_type = %zone_type, "no active delivery zone, falling back to other_domestic");
        if let Some(zone) = find_active(db, ZoneType::OtherDomestic).await? {
            return Ok(zone);
        }
    }

    ensure_default_zone(db, config, now).await
}

async fn find_active<C: ConnectionTrait>(db: &C, zone_type: ZoneType) -> AppResult<Option<ZoneModel>> {
    let zone = DeliveryZones::find()
        .filter(ZoneCol::ZoneType.eq(zone_type))
        .filter(ZoneCol::IsActive.eq(true))
        .one(db)
        .await?;
    Ok(zone)
}

/// Get-or-create of the `other_domestic` row. The insert is a no-op when the row
/// already exists, so concurrent first calls cannot create two of them.
async fn ensure_default_zone<C: ConnectionTrait>(
    db: &C,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> AppResult<ZoneModel> {
    let inserted = insert_zone_if_missing(db, config, ZoneType::OtherDomestic, now).await?;
    if inserted {
        tracing::warn!(
            fee = config.default_zone_fee,
            estimated_days = config.default_zone_days,
            "delivery zones were never seeded, created default other_domestic zone"
        );
    }

    let zone = DeliveryZones::find()
        .filter(ZoneCol::ZoneType.eq(ZoneType::OtherDomestic))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("default delivery zone vanished")))?;

    if !zone.is_active {
        tracing::warn!(zone_id = %zone.id, "other_domestic zone is deactivated, quoting with it anyway");
    }
    Ok(zone)
}

/// Seed values per zone type; `other_domestic` takes its fee from the config so the
/// seeded and self-created default zone agree.
fn zone_defaults(config: &PricingConfig, zone_type: ZoneType) -> (&'static str, i64, i32) {
    let (name, fee, days) = seed_defaults(zone_type);
    match zone_type {
        ZoneType::OtherDomestic => (name, config.default_zone_fee, config.default_zone_days),
        _ => (name, fee, days),
    }
}

async fn insert_zone_if_missing<C: ConnectionTrait>(
    db: &C,
    config: &PricingConfig,
    zone_type: ZoneType,
    now: DateTime<Utc>,
) -> AppResult<bool> {
    let (name, fee, estimated_days) = zone_defaults(config, zone_type);
    let zone = ZoneActive {
        id: Set(Uuid::new_v4()),
        zone_type: Set(zone_type),
        name: Set(name.to_string()),
        fee: Set(fee),
        estimated_days: Set(estimated_days),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let rows = DeliveryZones::insert(zone)
        .on_conflict(OnConflict::column(ZoneCol::ZoneType).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(rows > 0)
}

/// Administrative bootstrap. Existing zones are left untouched; returns how many were created.
pub async fn seed_default_zones(state: &AppState) -> AppResult<u64> {
    let now = state.clock.now();
    let mut created = 0;
    for zone_type in ZoneType::iter() {
        if insert_zone_if_missing(&state.orm, &state.pricing, zone_type, now).await? {
            tracing::info!(zone_type = %zone_type, "seeded delivery zone");
            created += 1;
        }
    }
    Ok(created)
}

pub async fn list_zones(state: &AppState) -> AppResult<Vec<DeliveryZone>> {
    let zones = DeliveryZones::find()
        .order_by_asc(ZoneCol::Fee)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(zone_from_entity)
        .collect();
    Ok(zones)
}

/// Staff edit of a zone. Zones are never deleted, only deactivated.
pub async fn update_zone(
    state: &AppState,
    user: &AuthUser,
    zone_type: ZoneType,
    payload: UpdateZoneRequest,
) -> AppResult<DeliveryZone> {
    ensure_admin(user)?;
    if payload.fee.is_some_and(|fee| fee < 0) {
        return Err(AppError::BadRequest("fee must not be negative".into()));
    }
    if payload.estimated_days.is_some_and(|days| days < 1) {
        return Err(AppError::BadRequest("estimated_days must be at least 1".into()));
    }
    if payload.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }

    let existing = DeliveryZones::find()
        .filter(ZoneCol::ZoneType.eq(zone_type))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ZoneActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(fee) = payload.fee {
        active.fee = Set(fee);
    }
    if let Some(days) = payload.estimated_days {
        active.estimated_days = Set(days);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(state.clock.now().into());
    let zone = active.update(&state.orm).await?;

    tracing::info!(
        user_id = %user.user_id,
        zone_type = %zone.zone_type,
        fee = zone.fee,
        is_active = zone.is_active,
        "delivery zone updated"
    );
    Ok(zone_from_entity(zone))
}
