mod common;

use checkout_pricing::{
    db::is_unique_violation,
    dto::addresses::SaveAddressRequest,
    entity::{delivery_addresses::ActiveModel as AddressActive, delivery_zones::ZoneType},
    error::AppError,
    services::{address_service, delivery_service},
};
use sea_orm::{ActiveModelTrait, Set};
use tokio::task::JoinSet;
use uuid::Uuid;

use common::{customer, setup_state, start};

fn address(city: &str, is_default: bool) -> SaveAddressRequest {
    SaveAddressRequest {
        recipient_name: "Awa Koné".into(),
        phone: "+225 07 00 00 00".into(),
        city: city.into(),
        postal_code: None,
        country: None,
        is_default,
    }
}

#[tokio::test]
async fn a_user_has_at_most_one_default_address() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    delivery_service::seed_default_zones(&state).await?;
    let user = customer();

    let first = address_service::save_address(&state, &user, address("Cocody", false)).await?;
    assert!(first.is_default, "first address becomes the default");
    assert!(first.zone_id.is_some());

    let second = address_service::save_address(&state, &user, address("Bouaké", true)).await?;
    assert!(second.is_default);

    let third = address_service::save_address(&state, &user, address("Bassam", false)).await?;
    assert!(!third.is_default);

    let listed = address_service::list_addresses(&state, &user).await?;
    assert_eq!(listed.len(), 3);
    assert_eq!(listed.iter().filter(|a| a.is_default).count(), 1);
    assert_eq!(listed[0].id, second.id);

    address_service::set_default_address(&state, &user, first.id).await?;
    let listed = address_service::list_addresses(&state, &user).await?;
    let defaults: Vec<_> = listed.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, first.id);

    // Another user's addresses are untouched and invisible.
    let other = customer();
    address_service::save_address(&state, &other, address("Abobo", true)).await?;
    assert_eq!(address_service::list_addresses(&state, &user).await?.len(), 3);
    let missing = address_service::set_default_address(&state, &other, first.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn saved_address_is_quoted_from_its_city() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    delivery_service::seed_default_zones(&state).await?;
    let user = customer();

    let saved = address_service::save_address(&state, &user, address("Treichville", true)).await?;
    let quote = address_service::quote_for_address(&state, &user, saved.id).await?;
    assert_eq!(quote.zone.zone_type, ZoneType::Abidjan);
    assert_eq!(saved.zone_id, Some(quote.zone.id));

    let blank = address_service::save_address(&state, &user, address("   ", false)).await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn storage_refuses_a_second_default_for_one_user() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    let user = customer();
    address_service::save_address(&state, &user, address("Cocody", true)).await?;

    let raw = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        recipient_name: Set("Awa Koné".into()),
        phone: Set("+225 07 00 00 00".into()),
        city: Set("Abobo".into()),
        postal_code: Set(None),
        country: Set("Côte d'Ivoire".into()),
        zone_id: Set(None),
        is_default: Set(true),
        created_at: Set(start().into()),
        updated_at: Set(start().into()),
    };
    let err = raw.clone().insert(&state.orm).await.expect_err("second default");
    assert!(is_unique_violation(&err));

    // Non-default rows are unrestricted.
    let mut other = raw;
    other.id = Set(Uuid::new_v4());
    other.is_default = Set(false);
    other.insert(&state.orm).await?;
    Ok(())
}

#[tokio::test]
async fn concurrent_first_saves_leave_one_default() -> anyhow::Result<()> {
    let (state, _clock) = setup_state().await?;
    delivery_service::seed_default_zones(&state).await?;
    let user = customer();

    let mut tasks = JoinSet::new();
    for city in ["Cocody", "Marcory", "Bouaké", "Bassam"] {
        let state = state.clone();
        let user = user.clone();
        tasks.spawn(async move {
            address_service::save_address(&state, &user, address(city, false)).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined??;
    }

    let listed = address_service::list_addresses(&state, &user).await?;
    assert_eq!(listed.len(), 4);
    assert_eq!(listed.iter().filter(|a| a.is_default).count(), 1);
    Ok(())
}
