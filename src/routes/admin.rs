use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{patch, post},
};

use crate::{
    dto::{coupons::CreateCouponRequest, delivery::UpdateZoneRequest},
    entity::delivery_zones::ZoneType,
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Coupon, DeliveryZone},
    response::{ApiResponse, Meta},
    services::{coupon_service, delivery_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/zones/{zone_type}", patch(update_zone))
        .route("/coupons", post(create_coupon))
        .route("/coupons/{code}/deactivate", patch(deactivate_coupon))
}

#[utoipa::path(
    patch,
    path = "/api/admin/zones/{zone_type}",
    params(
        ("zone_type" = ZoneType, Path, description = "abidjan, grand_bassam, other_domestic or international")
    ),
    request_body = UpdateZoneRequest,
    responses(
        (status = 200, description = "Change a zone's fee, estimate or active flag", body = ApiResponse<DeliveryZone>),
        (status = 400, description = "Invalid fee or estimate"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(zone_type): Path<ZoneType>,
    Json(payload): Json<UpdateZoneRequest>,
) -> AppResult<Json<ApiResponse<DeliveryZone>>> {
    let zone = delivery_service::update_zone(&state, &user, zone_type, payload).await?;
    Ok(Json(ApiResponse::success(
        "Zone updated",
        zone,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 200, description = "Create a coupon", body = ApiResponse<Coupon>),
        (status = 400, description = "Invalid coupon or duplicate code"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let coupon = coupon_service::create_coupon(&state, &user, payload).await?;
    Ok(Json(ApiResponse::success(
        "Coupon created",
        coupon,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/admin/coupons/{code}/deactivate",
    params(("code" = String, Path, description = "Coupon code")),
    responses(
        (status = 200, description = "Deactivate a coupon", body = ApiResponse<Coupon>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let coupon = coupon_service::deactivate_coupon(&state, &user, &code).await?;
    Ok(Json(ApiResponse::success(
        "Coupon deactivated",
        coupon,
        Some(Meta::empty()),
    )))
}
