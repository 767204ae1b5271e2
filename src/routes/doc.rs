use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::{AddressList, SaveAddressRequest},
        checkout::{CheckoutQuote, CheckoutQuoteRequest},
        coupons::{
            AppliedCoupon, ApplyCouponRequest, ApplyCouponResponse, CreateCouponRequest,
            ValidateCouponRequest, ValidateCouponResponse,
        },
        delivery::{DeliveryQuoteRequest, UpdateZoneRequest, ZoneList},
    },
    entity::{coupons::DiscountKind, delivery_zones::ZoneType},
    models::{
        Coupon, CouponUsage, DeliveryAddress, DeliveryQuote, DeliveryZone, OrderLine,
        OrderSnapshot,
    },
    pricing::coupons::CouponVerdict,
    response::{ApiResponse, Meta},
    routes::{addresses, admin, checkout, coupons, delivery, health},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        delivery::quote_delivery,
        delivery::list_zones,
        addresses::list_addresses,
        addresses::save_address,
        addresses::set_default_address,
        addresses::quote_for_address,
        coupons::validate_coupon,
        coupons::apply_coupon,
        checkout::quote_checkout,
        admin::update_zone,
        admin::create_coupon,
        admin::deactivate_coupon
    ),
    components(
        schemas(
            ZoneType,
            DiscountKind,
            DeliveryZone,
            DeliveryQuote,
            DeliveryAddress,
            Coupon,
            CouponUsage,
            OrderLine,
            OrderSnapshot,
            CouponVerdict,
            DeliveryQuoteRequest,
            UpdateZoneRequest,
            ZoneList,
            SaveAddressRequest,
            AddressList,
            ValidateCouponRequest,
            ValidateCouponResponse,
            ApplyCouponRequest,
            ApplyCouponResponse,
            AppliedCoupon,
            CreateCouponRequest,
            CheckoutQuoteRequest,
            CheckoutQuote,
            Meta,
            ApiResponse<DeliveryQuote>,
            ApiResponse<ZoneList>,
            ApiResponse<CheckoutQuote>,
            ApiResponse<ApplyCouponResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Delivery", description = "Delivery zones and fees"),
        (name = "Addresses", description = "Saved delivery addresses"),
        (name = "Coupons", description = "Coupon validation and application"),
        (name = "Checkout", description = "Order price quotes"),
        (name = "Admin", description = "Staff endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
