use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    checkout::{CheckoutOptions, Currency, CustomerInfo, Prefill, Theme},
    dto::orders::{CheckoutOptionsResponse, CreateOrderRequest, OrderList, VerifyPaymentRequest},
    models::Order,
    response::{ApiResponse, Meta},
    routes::{health, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::create_gateway_order,
        orders::checkout_options,
        orders::verify_payment,
    ),
    components(
        schemas(
            Order,
            OrderList,
            CreateOrderRequest,
            VerifyPaymentRequest,
            CheckoutOptionsResponse,
            CheckoutOptions,
            Prefill,
            Theme,
            Currency,
            CustomerInfo,
            params::SortOrder,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CheckoutOptionsResponse>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment gateway endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
