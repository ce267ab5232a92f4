use std::env;

use crate::checkout::{CHECKOUT_SCRIPT_URL, CheckoutSettings};
use crate::gateway::razorpay::DEFAULT_API_BASE;

#[derive(Clone)]
pub struct RazorpayConfig {
    pub api_base: String,
    pub key_id: String,
    pub key_secret: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("api_base", &self.api_base)
            .field("key_id", &self.key_id)
            .field("key_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub razorpay: RazorpayConfig,
    pub checkout: CheckoutSettings,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let razorpay = RazorpayConfig {
            api_base: env::var("RAZORPAY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            key_id: env::var("RAZORPAY_KEY_ID")
                .map_err(|_| anyhow::anyhow!("RAZORPAY_KEY_ID is not set"))?,
            key_secret: env::var("RAZORPAY_KEY_SECRET")
                .map_err(|_| anyhow::anyhow!("RAZORPAY_KEY_SECRET is not set"))?,
        };

        let mut checkout = CheckoutSettings::new(razorpay.key_id.clone());
        if let Ok(name) = env::var("STORE_NAME") {
            checkout.name = name;
        }
        if let Ok(description) = env::var("STORE_DESCRIPTION") {
            checkout.description = description;
        }
        checkout.image = env::var("STORE_LOGO_URL").ok().filter(|url| !url.is_empty());
        if let Ok(color) = env::var("CHECKOUT_THEME_COLOR") {
            checkout.theme_color = color;
        }
        checkout.script_url =
            env::var("CHECKOUT_SCRIPT_URL").unwrap_or_else(|_| CHECKOUT_SCRIPT_URL.to_string());

        Ok(Self {
            port,
            database_url,
            host,
            razorpay,
            checkout,
        })
    }
}
