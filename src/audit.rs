use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

pub async fn log_audit(
    pool: &DbPool,
    order_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, order_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(order_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record an audit row, logging instead of failing the caller.
pub async fn record(pool: &DbPool, order_id: Uuid, action: &str, metadata: Value) {
    if let Err(err) = log_audit(pool, Some(order_id), action, Some("orders"), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
