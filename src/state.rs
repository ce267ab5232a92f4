use std::sync::Arc;

use crate::checkout::CheckoutSettings;
use crate::db::DbPool;
use crate::gateway::GatewayOrders;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub gateway: Arc<dyn GatewayOrders>,
    pub checkout: CheckoutSettings,
    /// Used only to verify payment signatures; never sent to clients.
    pub key_secret: String,
}
