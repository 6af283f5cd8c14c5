use super::wire::{self, GatewayResponse, Operation, WireRequest};
use crate::config::GatewayProfile;
use crate::domain::description::PaymentDescription;
use crate::domain::identifiers::SessionId;
use crate::domain::ports::GatewayClient;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use tracing::{debug, instrument, warn};

/// Gateway client speaking the Payture-style form protocol over HTTP.
#[derive(Debug, Clone)]
pub struct PaytureClient {
    base_url: String,
    merchant_key: String,
    http: reqwest::Client,
}

impl PaytureClient {
    pub fn new(base_url: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self::with_http(base_url, merchant_key, reqwest::Client::new())
    }

    pub fn with_http(
        base_url: impl Into<String>,
        merchant_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            merchant_key: merchant_key.into(),
            http,
        }
    }

    /// Builds a client from a validated profile, applying its timeout.
    pub fn from_profile(profile: &GatewayProfile) -> Result<Self> {
        profile.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = profile.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PaymentError::ConfigError(format!("cannot build HTTP client: {e}")))?;

        Ok(Self::with_http(
            profile.base_url.clone(),
            profile.merchant_key.clone(),
            http,
        ))
    }

    pub fn endpoint_url(&self, operation: Operation) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            operation.endpoint()
        )
    }

    async fn send(&self, request: &WireRequest) -> Result<GatewayResponse> {
        let url = self.endpoint_url(request.operation);
        debug!(%url, "posting gateway request");

        let response = self
            .http
            .post(&url)
            .form(&request.form())
            .send()
            .await
            .map_err(|e| {
                PaymentError::GatewayError(format!("{} request failed: {e}", request.operation))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            PaymentError::GatewayError(format!("{} response unreadable: {e}", request.operation))
        })?;

        if !status.is_success() {
            warn!(%status, operation = %request.operation, "gateway returned an error status");
            return Err(PaymentError::GatewayError(format!(
                "{} returned HTTP {status}",
                request.operation
            )));
        }

        wire::decode_response(&body)
    }

    async fn send_for_outcome(&self, request: WireRequest, order_id: &str) -> Result<bool> {
        let response = self.send(&request).await?;
        if !response.success {
            warn!(
                order_id,
                operation = %request.operation,
                err_code = response.err_code.as_deref().unwrap_or("unknown"),
                "gateway rejected request"
            );
        }
        Ok(response.success)
    }
}

#[async_trait]
impl GatewayClient for PaytureClient {
    #[instrument(skip(self, description))]
    async fn init(
        &self,
        order_id: &str,
        amount: i64,
        client_ip: IpAddr,
        description: Option<&PaymentDescription>,
    ) -> Result<SessionId> {
        let request = wire::init_request(&self.merchant_key, order_id, amount, client_ip, description);
        let response = self.send(&request).await?;

        match response {
            GatewayResponse {
                success: true,
                session_id: Some(session_id),
                ..
            } => Ok(session_id),
            GatewayResponse { success: true, .. } => Err(PaymentError::GatewayError(format!(
                "Init for order {order_id} succeeded without a session id"
            ))),
            GatewayResponse { err_code, .. } => Err(PaymentError::GatewayError(format!(
                "Init for order {order_id} rejected: {}",
                err_code.as_deref().unwrap_or("unknown")
            ))),
        }
    }

    #[instrument(skip(self, session_id))]
    async fn charge(&self, order_id: &str, session_id: &SessionId) -> Result<bool> {
        let request = wire::charge_request(&self.merchant_key, order_id, session_id);
        self.send_for_outcome(request, order_id).await
    }

    #[instrument(skip(self))]
    async fn unblock(&self, order_id: &str, amount: i64) -> Result<bool> {
        let request = wire::unblock_request(&self.merchant_key, order_id, amount);
        self.send_for_outcome(request, order_id).await
    }

    #[instrument(skip(self))]
    async fn refund(&self, order_id: &str, amount: i64) -> Result<bool> {
        let request = wire::refund_request(&self.merchant_key, order_id, amount);
        self.send_for_outcome(request, order_id).await
    }
}
