use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Currencies the store can charge in. The storefront only sells in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Currency {
    #[default]
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
        }
    }

    /// Number of minor units (paise) in one major unit.
    pub fn minor_unit_factor(&self) -> i64 {
        match self {
            Currency::Inr => 100,
        }
    }

    /// Convert a decimal amount to the gateway's integer minor-unit convention.
    ///
    /// Returns `None` when the amount does not fit in an `i64` after scaling.
    pub fn to_minor_units(&self, amount: Decimal) -> Option<i64> {
        amount
            .checked_mul(Decimal::from(self.minor_unit_factor()))?
            .round()
            .to_i64()
    }

    pub fn from_minor_units(&self, minor: i64) -> Decimal {
        Decimal::from(minor) / Decimal::from(self.minor_unit_factor())
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single purchase attempt as seen by the checkout flow.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOrder {
    pub id: Uuid,
    /// Total in major currency units (e.g. `500.00` rupees).
    pub amount: Decimal,
    pub currency: Currency,
    /// Order reference issued by the payment backend. Required before the
    /// widget can be opened.
    pub gateway_order_id: Option<String>,
}

impl CheckoutOrder {
    pub fn new(id: Uuid, amount: Decimal) -> Self {
        Self {
            id,
            amount,
            currency: Currency::Inr,
            gateway_order_id: None,
        }
    }

    pub fn with_gateway_order(mut self, gateway_order_id: impl Into<String>) -> Self {
        self.gateway_order_id = Some(gateway_order_id.into());
        self
    }

    /// The gateway reference, treating an empty string as absent.
    pub fn gateway_order(&self) -> Option<&str> {
        self.gateway_order_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn amount_minor(&self) -> Option<i64> {
        self.currency.to_minor_units(self.amount)
    }
}

/// Contact details used to prefill the widget form. Passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_rupees_to_paise() {
        assert_eq!(Currency::Inr.to_minor_units(dec!(500.00)), Some(50000));
        assert_eq!(Currency::Inr.to_minor_units(dec!(12.344)), Some(1234));
        assert_eq!(Currency::Inr.to_minor_units(dec!(0.5)), Some(50));
    }

    #[test]
    fn converts_paise_back_to_rupees() {
        assert_eq!(Currency::Inr.from_minor_units(50000), dec!(500));
        assert_eq!(Currency::Inr.from_minor_units(1999), dec!(19.99));
    }

    #[test]
    fn empty_gateway_reference_counts_as_missing() {
        let order = CheckoutOrder::new(Uuid::new_v4(), dec!(10)).with_gateway_order("");
        assert_eq!(order.gateway_order(), None);

        let order = order.with_gateway_order("order_abc");
        assert_eq!(order.gateway_order(), Some("order_abc"));
    }

    #[test]
    fn currency_serializes_as_code() {
        let json = serde_json::to_string(&Currency::Inr).unwrap();
        assert_eq!(json, "\"INR\"");
    }
}
