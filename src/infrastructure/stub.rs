use crate::domain::description::PaymentDescription;
use crate::domain::identifiers::SessionId;
use crate::domain::ports::GatewayClient;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call received by a [`StubGatewayClient`], with the arguments it was given.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Init {
        order_id: String,
        amount: i64,
        client_ip: IpAddr,
        description: Option<PaymentDescription>,
    },
    Charge {
        order_id: String,
        session_id: SessionId,
    },
    Unblock {
        order_id: String,
        amount: i64,
    },
    Refund {
        order_id: String,
        amount: i64,
    },
}

/// Gateway client returning caller-stubbed results.
///
/// Clones share one call log, so a clone handed to a configurator can be
/// inspected through any other handle.
#[derive(Debug, Clone)]
pub struct StubGatewayClient {
    session_id: SessionId,
    init_failure: Option<String>,
    charge_result: bool,
    unblock_result: bool,
    refund_result: bool,
    calls: Arc<RwLock<Vec<GatewayCall>>>,
}

impl StubGatewayClient {
    /// Creates a stub that accepts every call and issues `session_id` on init.
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            init_failure: None,
            charge_result: true,
            unblock_result: true,
            refund_result: true,
            calls: Arc::default(),
        }
    }

    pub fn with_init_failure(mut self, reason: impl Into<String>) -> Self {
        self.init_failure = Some(reason.into());
        self
    }

    pub fn with_charge_result(mut self, result: bool) -> Self {
        self.charge_result = result;
        self
    }

    pub fn with_unblock_result(mut self, result: bool) -> Self {
        self.unblock_result = result;
        self
    }

    pub fn with_refund_result(mut self, result: bool) -> Self {
        self.refund_result = result;
        self
    }

    /// Calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.read().await.clone()
    }

    async fn record(&self, call: GatewayCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl GatewayClient for StubGatewayClient {
    async fn init(
        &self,
        order_id: &str,
        amount: i64,
        client_ip: IpAddr,
        description: Option<&PaymentDescription>,
    ) -> Result<SessionId> {
        self.record(GatewayCall::Init {
            order_id: order_id.to_string(),
            amount,
            client_ip,
            description: description.cloned(),
        })
        .await;

        match &self.init_failure {
            Some(reason) => Err(PaymentError::GatewayError(reason.clone())),
            None => Ok(self.session_id.clone()),
        }
    }

    async fn charge(&self, order_id: &str, session_id: &SessionId) -> Result<bool> {
        self.record(GatewayCall::Charge {
            order_id: order_id.to_string(),
            session_id: session_id.clone(),
        })
        .await;
        Ok(self.charge_result)
    }

    async fn unblock(&self, order_id: &str, amount: i64) -> Result<bool> {
        self.record(GatewayCall::Unblock {
            order_id: order_id.to_string(),
            amount,
        })
        .await;
        Ok(self.unblock_result)
    }

    async fn refund(&self, order_id: &str, amount: i64) -> Result<bool> {
        self.record(GatewayCall::Refund {
            order_id: order_id.to_string(),
            amount,
        })
        .await;
        Ok(self.refund_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_calls_across_clones() {
        let stub = StubGatewayClient::new("session-1");
        let clone = stub.clone();

        let session = clone
            .init("order-1", 100, "10.0.0.1".parse().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(session.as_str(), "session-1");
        assert!(clone.refund("order-1", 100).await.unwrap());

        let calls = stub.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            GatewayCall::Refund {
                order_id: "order-1".to_string(),
                amount: 100,
            }
        );
    }

    #[tokio::test]
    async fn test_stub_stubbed_results() {
        let stub = StubGatewayClient::new("session-1")
            .with_charge_result(false)
            .with_unblock_result(false)
            .with_init_failure("declined");

        assert!(!stub.charge("order-1", &SessionId::new("s")).await.unwrap());
        assert!(!stub.unblock("order-1", 1).await.unwrap());
        assert!(matches!(
            stub.init("order-1", 1, "10.0.0.1".parse().unwrap(), None).await,
            Err(PaymentError::GatewayError(_))
        ));
    }
}
