use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;
use utoipa::ToSchema;

use super::order::{CheckoutOrder, CustomerInfo};
use super::outcome::{PaymentFailure, PaymentSuccess};
use super::script::CHECKOUT_SCRIPT_URL;

/// Static storefront branding and credentials shared by every session.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Publishable key id. Never the key secret.
    pub key_id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub theme_color: String,
    pub script_url: String,
}

impl CheckoutSettings {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            name: "Spice Store".to_string(),
            description: "Order payment".to_string(),
            image: None,
            theme_color: "#3399cc".to_string(),
            script_url: CHECKOUT_SCRIPT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Prefill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Theme {
    pub color: String,
}

/// Configuration object passed to the widget constructor, using the
/// provider's field names. The `handler` and `modal.ondismiss` callbacks are
/// carried separately by [`WidgetEvents`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutOptions {
    pub key: String,
    /// Integer minor units.
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub order_id: String,
    pub prefill: Prefill,
    pub theme: Theme,
}

impl CheckoutOptions {
    pub fn build(
        order: &CheckoutOrder,
        customer: &CustomerInfo,
        settings: &CheckoutSettings,
    ) -> Result<Self, PaymentFailure> {
        let order_id = order
            .gateway_order()
            .ok_or(PaymentFailure::MissingGatewayOrder)?;
        // Only overflow is refused here. Zero or negative totals go to the
        // provider as-is; order creation is where amounts are validated.
        let amount = order.amount_minor().ok_or_else(|| {
            PaymentFailure::WidgetConstruction(format!("amount {} out of range", order.amount))
        })?;

        Ok(Self {
            key: settings.key_id.clone(),
            amount,
            currency: order.currency.code().to_string(),
            name: settings.name.clone(),
            description: settings.description.clone(),
            image: settings.image.clone(),
            order_id: order_id.to_string(),
            prefill: Prefill {
                name: customer.name.clone(),
                email: customer.email.clone(),
                contact: customer.contact.clone(),
            },
            theme: Theme {
                color: settings.theme_color.clone(),
            },
        })
    }
}

/// Payload the widget hands to its success handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WidgetResponse {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

impl From<WidgetResponse> for PaymentSuccess {
    fn from(response: WidgetResponse) -> Self {
        Self {
            payment_id: response.razorpay_payment_id,
            gateway_order_id: response.razorpay_order_id,
            signature: response.razorpay_signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Paid(WidgetResponse),
    Dismissed,
}

/// The widget's `handler` and `modal.ondismiss` callbacks.
///
/// Both consume the value: a widget can report one outcome per session.
#[derive(Debug)]
pub struct WidgetEvents {
    tx: oneshot::Sender<WidgetEvent>,
}

impl WidgetEvents {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<WidgetEvent>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn handler(self, response: WidgetResponse) {
        if self.tx.send(WidgetEvent::Paid(response)).is_err() {
            tracing::debug!("payment reported after checkout was unmounted");
        }
    }

    pub fn dismiss(self) {
        if self.tx.send(WidgetEvent::Dismissed).is_err() {
            tracing::debug!("dismissal reported after checkout was unmounted");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("payment widget is not available")]
    Unavailable,

    #[error("payment widget rejected configuration: {0}")]
    Rejected(String),
}

/// One constructed widget instance.
pub trait PaymentWidget: Send {
    /// Show the modal.
    fn open(&mut self) -> Result<(), WidgetError>;

    /// Hide the modal. Called when the session is torn down while open.
    fn close(&mut self) {}
}

/// The widget's global constructor.
pub trait PaymentWidgetFactory: Send + Sync {
    fn construct(
        &self,
        options: &CheckoutOptions,
        events: WidgetEvents,
    ) -> Result<Box<dyn PaymentWidget>, WidgetError>;
}
