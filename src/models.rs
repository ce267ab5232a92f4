use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::checkout::{CheckoutOrder, Currency, CustomerInfo};

pub const PAYMENT_UNPAID: &str = "unpaid";
pub const PAYMENT_PAID: &str = "paid";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    /// Minor units (paise).
    pub total_amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAYMENT_PAID
    }

    /// Total in major units, e.g. `500.00` for 50000 paise.
    pub fn amount(&self) -> Decimal {
        Currency::Inr.from_minor_units(self.total_amount)
    }

    pub fn to_checkout(&self) -> CheckoutOrder {
        CheckoutOrder {
            id: self.id,
            amount: self.amount(),
            currency: Currency::Inr,
            gateway_order_id: self.gateway_order_id.clone(),
        }
    }

    pub fn customer(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.customer_name.clone(),
            email: self.customer_email.clone(),
            contact: self.customer_phone.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
