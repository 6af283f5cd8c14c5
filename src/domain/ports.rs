use super::description::PaymentDescription;
use super::identifiers::{GatewayName, SessionId};
use crate::error::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// One payment gateway's protocol for the four lifecycle calls.
///
/// Amounts are always in minor units.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Opens a blocking session and returns the gateway's session id.
    async fn init(
        &self,
        order_id: &str,
        amount: i64,
        client_ip: IpAddr,
        description: Option<&PaymentDescription>,
    ) -> Result<SessionId>;

    async fn charge(&self, order_id: &str, session_id: &SessionId) -> Result<bool>;

    async fn unblock(&self, order_id: &str, amount: i64) -> Result<bool>;

    async fn refund(&self, order_id: &str, amount: i64) -> Result<bool>;
}

pub type GatewayClientBox = Box<dyn GatewayClient>;

pub type GatewayClientFactory = Box<dyn Fn() -> GatewayClientBox + Send + Sync>;

/// Resolves a gateway name to a freshly configured client.
pub trait GatewayConfigurator: Send + Sync {
    fn resolve(&self, name: &GatewayName) -> Result<GatewayClientBox>;
}
