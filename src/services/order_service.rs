use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    audit,
    checkout::{CheckoutOptions, Currency},
    dto::orders::{CheckoutOptionsResponse, CreateOrderRequest, OrderList, VerifyPaymentRequest},
    error::{AppError, AppResult},
    gateway::{GatewayOrderRequest, verify_payment_signature},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("Amount must be positive".into()));
    }
    let currency = Currency::Inr;
    let total_amount = currency
        .to_minor_units(payload.amount)
        .filter(|minor| *minor > 0)
        .ok_or_else(|| AppError::BadRequest("Amount is out of range".into()))?;

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (id, total_amount, currency, customer_name, customer_email, customer_phone)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(total_amount)
    .bind(currency.code())
    .bind(payload.customer_name)
    .bind(payload.customer_email)
    .bind(payload.customer_phone)
    .fetch_one(&state.pool)
    .await?;

    audit::record(
        &state.pool,
        order.id,
        "order_created",
        serde_json::json!({ "total_amount": order.total_amount }),
    )
    .await;

    Ok(ApiResponse::single("Order created", order))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let status = query.status.filter(|s| !s.is_empty());
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let sql = format!(
        "SELECT * FROM orders WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at {} LIMIT $2 OFFSET $3",
        sort_order.as_sql()
    );
    let items = sqlx::query_as::<_, Order>(&sql)
        .bind(status.clone())
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT count(*) FROM orders WHERE ($1::text IS NULL OR status = $1)")
            .bind(status)
            .fetch_one(&state.pool)
            .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = find_order(state, id).await?;
    Ok(ApiResponse::single("OK", order))
}

/// Ask the payment provider for an order reference. Reuses the existing
/// reference when one was already issued.
pub async fn create_gateway_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = find_order(state, id).await?;

    if order.is_paid() {
        return Err(AppError::BadRequest("Order already paid".into()));
    }
    if order.gateway_order_id.is_some() {
        return Ok(ApiResponse::single("Gateway order exists", order));
    }

    let request = GatewayOrderRequest {
        amount: order.total_amount,
        currency: order.currency.clone(),
        receipt: format!("rcpt_{}", order.id.simple()),
        payment_capture: 1,
    };
    let gateway_order = state.gateway.create_order(request.clone()).await?;
    if let Err(err) = gateway_order.ensure_matches(&request) {
        tracing::warn!(order_id = %order.id, error = %err, "gateway order rejected");
        return Err(err.into());
    }

    let updated = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders SET gateway_order_id = $2, updated_at = now()
        WHERE id = $1 AND gateway_order_id IS NULL
        RETURNING *
        "#,
    )
    .bind(order.id)
    .bind(&gateway_order.id)
    .fetch_optional(&state.pool)
    .await?;

    let order = match updated {
        Some(o) => o,
        // Another request stored a reference first; keep theirs.
        None => find_order(state, id).await?,
    };

    audit::record(
        &state.pool,
        order.id,
        "gateway_order_created",
        serde_json::json!({
            "gateway": state.gateway.name(),
            "gateway_order_id": gateway_order.id,
        }),
    )
    .await;

    Ok(ApiResponse::single("Gateway order created", order))
}

/// The widget configuration the storefront passes to the checkout script.
pub async fn checkout_options(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<CheckoutOptionsResponse>> {
    let order = find_order(state, id).await?;
    if order.is_paid() {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let options = CheckoutOptions::build(&order.to_checkout(), &order.customer(), &state.checkout)
        .map_err(|failure| AppError::BadRequest(failure.to_string()))?;

    Ok(ApiResponse::single(
        "Checkout options",
        CheckoutOptionsResponse {
            script_url: state.checkout.script_url.clone(),
            options,
        },
    ))
}

/// Confirm the signature the widget returned and mark the order paid.
pub async fn verify_payment(
    state: &AppState,
    id: Uuid,
    payload: VerifyPaymentRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut tx = state.pool.begin().await?;

    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if order.is_paid() {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let matches_order = order.gateway_order_id.as_deref() == Some(payload.razorpay_order_id.as_str());
    let valid = matches_order
        && verify_payment_signature(
            &payload.razorpay_order_id,
            &payload.razorpay_payment_id,
            &payload.razorpay_signature,
            &state.key_secret,
        );

    if !valid {
        tx.rollback().await?;
        tracing::warn!(
            order_id = %order.id,
            payment_id = %payload.razorpay_payment_id,
            matches_order,
            "payment signature rejected"
        );
        audit::record(
            &state.pool,
            order.id,
            "payment_rejected",
            serde_json::json!({
                "payment_id": payload.razorpay_payment_id,
                "gateway_order_id": payload.razorpay_order_id,
            }),
        )
        .await;
        return Err(AppError::BadRequest("Invalid payment signature".into()));
    }

    let order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
        SET payment_status = 'paid', status = 'paid', gateway_payment_id = $2,
            paid_at = now(), updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(order.id)
    .bind(&payload.razorpay_payment_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(order_id = %order.id, payment_id = %payload.razorpay_payment_id, "payment verified");
    audit::record(
        &state.pool,
        order.id,
        "payment_verified",
        serde_json::json!({ "payment_id": payload.razorpay_payment_id }),
    )
    .await;

    Ok(ApiResponse::single("Payment verified", order))
}

async fn find_order(state: &AppState, id: Uuid) -> AppResult<Order> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    order.ok_or(AppError::NotFound)
}
