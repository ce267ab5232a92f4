use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{GatewayError, GatewayOrder, GatewayOrderRequest, GatewayOrders};

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

pub struct RazorpayClient {
    base_url: String,
    key_id: String,
    key_secret: String,
    client: Client,
}

impl RazorpayClient {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            client,
        })
    }
}

#[async_trait]
impl GatewayOrders for RazorpayClient {
    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.base_url);
        let response = self
            .client
            .post(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default().chars().take(200).collect();
            tracing::warn!(status = %status, receipt = %request.receipt, "gateway order rejected");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let order = response.json::<GatewayOrder>().await?;
        tracing::info!(gateway_order_id = %order.id, receipt = %request.receipt, "gateway order created");
        Ok(order)
    }

    fn name(&self) -> &str {
        "razorpay"
    }
}
