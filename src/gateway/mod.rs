pub mod razorpay;
pub mod signature;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use razorpay::RazorpayClient;
pub use signature::{expected_signature, verify_payment_signature};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("gateway order {id} is for {actual}, expected {expected}")]
    Mismatch {
        id: String,
        expected: String,
        actual: String,
    },
}

/// Order creation request sent to the payment provider.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrderRequest {
    /// Integer minor units.
    pub amount: i64,
    pub currency: String,
    /// Our own reference, echoed back by the provider.
    pub receipt: String,
    pub payment_capture: u8,
}

/// Order as created on the provider side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

impl GatewayOrder {
    /// Fails unless the provider echoed back the amount and currency we asked for.
    pub fn ensure_matches(&self, request: &GatewayOrderRequest) -> Result<(), GatewayError> {
        if self.amount == request.amount && self.currency.eq_ignore_ascii_case(&request.currency) {
            return Ok(());
        }
        Err(GatewayError::Mismatch {
            id: self.id.clone(),
            expected: format!("{} {}", request.amount, request.currency),
            actual: format!("{} {}", self.amount, self.currency),
        })
    }
}

/// Server-side half of the payment provider: issues the order reference the
/// checkout widget needs.
#[async_trait]
pub trait GatewayOrders: Send + Sync {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GatewayOrderRequest {
        GatewayOrderRequest {
            amount: 50000,
            currency: "INR".into(),
            receipt: "rcpt_1".into(),
            payment_capture: 1,
        }
    }

    fn created(amount: i64, currency: &str) -> GatewayOrder {
        GatewayOrder {
            id: "order_abc".into(),
            amount,
            currency: currency.into(),
            status: "created".into(),
        }
    }

    #[test]
    fn echoed_order_matches_request() {
        assert!(created(50000, "INR").ensure_matches(&request()).is_ok());
    }

    #[test]
    fn different_amount_or_currency_is_refused() {
        let err = created(5000, "INR").ensure_matches(&request()).unwrap_err();
        assert!(matches!(err, GatewayError::Mismatch { ref id, .. } if id == "order_abc"));
        assert_eq!(
            err.to_string(),
            "gateway order order_abc is for 5000 INR, expected 50000 INR"
        );

        assert!(created(50000, "USD").ensure_matches(&request()).is_err());
    }
}
