use serde::Serialize;
use thiserror::Error;

/// Identifiers returned by the widget on a completed payment. They are opaque
/// here; the order backend verifies the signature before marking anything paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSuccess {
    pub payment_id: String,
    pub gateway_order_id: String,
    pub signature: String,
}

/// Why a checkout attempt ended without a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentFailure {
    #[error("Error initializing payment")]
    MissingGatewayOrder,

    #[error("Failed to load payment gateway")]
    ScriptLoadFailed(String),

    #[error("Error initializing payment")]
    WidgetConstruction(String),

    #[error("Payment cancelled")]
    UserCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    MissingGatewayOrder,
    ScriptLoadFailed,
    ConstructionError,
    UserCancelled,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::MissingGatewayOrder => "missing-gateway-order",
            FailureReason::ScriptLoadFailed => "script-load-failed",
            FailureReason::ConstructionError => "construction-error",
            FailureReason::UserCancelled => "user-cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Info,
    Error,
}

/// What the storefront should show the shopper after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl PaymentFailure {
    pub fn reason(&self) -> FailureReason {
        match self {
            PaymentFailure::MissingGatewayOrder => FailureReason::MissingGatewayOrder,
            PaymentFailure::ScriptLoadFailed(_) => FailureReason::ScriptLoadFailed,
            PaymentFailure::WidgetConstruction(_) => FailureReason::ConstructionError,
            PaymentFailure::UserCancelled => FailureReason::UserCancelled,
        }
    }

    /// Underlying cause reported by the script host or widget, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            PaymentFailure::ScriptLoadFailed(detail) | PaymentFailure::WidgetConstruction(detail) => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }

    /// Whether remounting the checkout with the same order can succeed.
    /// A missing gateway order needs a new server-created order first.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, PaymentFailure::MissingGatewayOrder)
    }

    pub fn notice(&self) -> Notice {
        match self {
            PaymentFailure::UserCancelled | PaymentFailure::ScriptLoadFailed(_) => Notice {
                severity: NoticeSeverity::Info,
                text: self.to_string(),
            },
            PaymentFailure::MissingGatewayOrder | PaymentFailure::WidgetConstruction(_) => Notice {
                severity: NoticeSeverity::Error,
                text: "Payment initialization failed".to_string(),
            },
        }
    }
}

/// Terminal result of one checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded(PaymentSuccess),
    Failed(PaymentFailure),
}

impl PaymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Succeeded(_))
    }

    /// Forward the outcome to the caller's handlers.
    pub fn dispatch<C: PaymentCallbacks + ?Sized>(&self, callbacks: &C) {
        match self {
            PaymentOutcome::Succeeded(success) => callbacks.on_success(
                &success.payment_id,
                &success.gateway_order_id,
                &success.signature,
            ),
            PaymentOutcome::Failed(failure) => callbacks.on_failure(failure),
        }
    }
}

/// The only two ways a result leaves the checkout flow.
pub trait PaymentCallbacks: Send + Sync {
    fn on_success(&self, payment_id: &str, order_id: &str, signature: &str);

    fn on_failure(&self, error: &PaymentFailure);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_storefront_copy() {
        assert_eq!(
            PaymentFailure::MissingGatewayOrder.to_string(),
            "Error initializing payment"
        );
        assert_eq!(
            PaymentFailure::ScriptLoadFailed("net::ERR_FAILED".into()).to_string(),
            "Failed to load payment gateway"
        );
        assert_eq!(PaymentFailure::UserCancelled.reason().as_str(), "user-cancelled");
    }

    #[test]
    fn cancellation_and_load_failure_are_not_alarming() {
        assert_eq!(
            PaymentFailure::UserCancelled.notice().severity,
            NoticeSeverity::Info
        );
        assert_eq!(
            PaymentFailure::ScriptLoadFailed(String::new()).notice().severity,
            NoticeSeverity::Info
        );

        let notice = PaymentFailure::WidgetConstruction("boom".into()).notice();
        assert_eq!(notice.severity, NoticeSeverity::Error);
        assert_eq!(notice.text, "Payment initialization failed");
    }

    #[test]
    fn only_missing_gateway_order_is_final() {
        assert!(!PaymentFailure::MissingGatewayOrder.is_retryable());
        assert!(PaymentFailure::ScriptLoadFailed(String::new()).is_retryable());
        assert!(PaymentFailure::UserCancelled.is_retryable());
    }
}
