use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutOptionsResponse, CreateOrderRequest, OrderList, VerifyPaymentRequest},
    error::AppResult,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/gateway-order", post(create_gateway_order))
        .route("/{id}/checkout-options", get(checkout_options))
        .route("/{id}/verify-payment", post(verify_payment))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<Order>),
        (status = 400, description = "Invalid amount"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let response = order_service::create_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::list_orders(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(order_service::get_order(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/gateway-order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Gateway order reference issued", body = ApiResponse<Order>),
        (status = 400, description = "Order already paid"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Payment gateway error"),
    ),
    tag = "Payments"
)]
pub async fn create_gateway_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(order_service::create_gateway_order(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/checkout-options",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Widget configuration", body = ApiResponse<CheckoutOptionsResponse>),
        (status = 400, description = "No gateway order reference yet"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Payments"
)]
pub async fn checkout_options(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CheckoutOptionsResponse>>> {
    Ok(Json(order_service::checkout_options(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/verify-payment",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = ApiResponse<Order>),
        (status = 400, description = "Invalid signature or already paid"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(order_service::verify_payment(&state, id, payload).await?))
}
