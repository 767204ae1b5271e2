use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    db::is_unique_violation,
    dto::addresses::SaveAddressRequest,
    entity::delivery_addresses::{
        ActiveModel as AddressActive, Column as AddressCol, Entity as DeliveryAddresses,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeliveryAddress, DeliveryQuote, address_from_entity},
    pricing::zones::zone_type_for,
    services::delivery_service::{quote_from_zone, zone_for_type},
    state::AppState,
};

pub async fn list_addresses(state: &AppState, user: &AuthUser) -> AppResult<Vec<DeliveryAddress>> {
    let items = DeliveryAddresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_desc(AddressCol::IsDefault)
        .order_by_desc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(address_from_entity)
        .collect();
    Ok(items)
}

/// Stores a new address with its zone resolved. The user's first address, or one
/// flagged default, becomes the only default; a partial unique index on
/// `(user_id) WHERE is_default` backs that up under concurrent saves.
pub async fn save_address(
    state: &AppState,
    user: &AuthUser,
    payload: SaveAddressRequest,
) -> AppResult<DeliveryAddress> {
    let recipient_name = required(&payload.recipient_name, "recipient_name")?;
    let phone = required(&payload.phone, "phone")?;
    let city = required(&payload.city, "city")?;
    let country = payload
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(&state.pricing.home_country)
        .to_string();

    let now = state.clock.now();
    let zone_type = zone_type_for(&city, &country, &state.pricing);
    let zone = zone_for_type(&state.orm, &state.pricing, zone_type, now).await?;

    let draft = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        recipient_name: Set(recipient_name),
        phone: Set(phone),
        city: Set(city),
        postal_code: Set(payload
            .postal_code
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())),
        country: Set(country),
        zone_id: Set(Some(zone.id)),
        is_default: NotSet,
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    match insert_address(state, user.user_id, draft.clone(), payload.is_default).await {
        // A concurrent save for the same user took the default slot first; the
        // retry sees that address and no longer claims it implicitly.
        Err(AppError::OrmError(err)) if is_unique_violation(&err) => {
            tracing::warn!(user_id = %user.user_id, "concurrent default address write, retrying");
            insert_address(state, user.user_id, draft, payload.is_default).await
        }
        other => other,
    }
}

async fn insert_address(
    state: &AppState,
    user_id: Uuid,
    mut draft: AddressActive,
    wants_default: bool,
) -> AppResult<DeliveryAddress> {
    let txn = state.orm.begin().await?;

    let existing = DeliveryAddresses::find()
        .filter(AddressCol::UserId.eq(user_id))
        .count(&txn)
        .await?;
    let is_default = wants_default || existing == 0;
    if is_default {
        clear_defaults(&txn, user_id).await?;
    }

    draft.is_default = Set(is_default);
    let address = draft.insert(&txn).await?;

    txn.commit().await?;

    Ok(address_from_entity(address))
}

pub async fn set_default_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<DeliveryAddress> {
    let txn = state.orm.begin().await?;

    let address = DeliveryAddresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::UserId.eq(user.user_id))
                .add(AddressCol::Id.eq(id)),
        )
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    clear_defaults(&txn, user.user_id).await?;

    let mut active: AddressActive = address.into();
    active.is_default = Set(true);
    active.updated_at = Set(state.clock.now().into());
    let address = active.update(&txn).await?;

    txn.commit().await?;

    Ok(address_from_entity(address))
}

/// Delivery quote for one of the user's saved addresses, re-resolved from its city.
pub async fn quote_for_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<DeliveryQuote> {
    let address = DeliveryAddresses::find()
        .filter(
            Condition::all()
                .add(AddressCol::UserId.eq(user.user_id))
                .add(AddressCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let zone_type = zone_type_for(&address.city, &address.country, &state.pricing);
    let zone = zone_for_type(&state.orm, &state.pricing, zone_type, state.clock.now()).await?;

    if address.zone_id != Some(zone.id) {
        let mut active: AddressActive = address.into();
        active.zone_id = Set(Some(zone.id));
        active.updated_at = Set(state.clock.now().into());
        active.update(&state.orm).await?;
    }

    Ok(quote_from_zone(zone, state.clock.today()))
}

async fn clear_defaults<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<()> {
    DeliveryAddresses::update_many()
        .col_expr(AddressCol::IsDefault, Expr::value(false))
        .filter(AddressCol::UserId.eq(user_id))
        .filter(AddressCol::IsDefault.eq(true))
        .exec(db)
        .await?;
    Ok(())
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}
