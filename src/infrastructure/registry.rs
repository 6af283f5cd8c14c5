use crate::config::GatewaysConfig;
use crate::domain::identifiers::GatewayName;
use crate::domain::ports::{GatewayClient, GatewayClientBox, GatewayClientFactory, GatewayConfigurator};
use crate::error::{PaymentError, Result};
use crate::infrastructure::payture::client::PaytureClient;
use std::collections::HashMap;

/// A configurator backed by a map of gateway names to client factories.
///
/// Every `resolve` runs the factory again, so each transition gets its own client.
#[derive(Default)]
pub struct GatewayRegistry {
    factories: HashMap<GatewayName, GatewayClientFactory>,
}

impl GatewayRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry with one wire client per configured profile.
    pub fn from_config(config: &GatewaysConfig) -> Result<Self> {
        let mut registry = Self::new();
        for (name, profile) in &config.gateways {
            let client = PaytureClient::from_profile(profile)?;
            registry.register_client(name.as_str(), client);
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: impl Into<GatewayName>,
        factory: GatewayClientFactory,
    ) -> &mut Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Registers a client that is cloned on every resolve.
    pub fn register_client<C>(&mut self, name: impl Into<GatewayName>, client: C) -> &mut Self
    where
        C: GatewayClient + Clone + 'static,
    {
        self.register(name, Box::new(move || Box::new(client.clone()) as GatewayClientBox))
    }

    pub fn contains(&self, name: &GatewayName) -> bool {
        self.factories.contains_key(name)
    }
}

impl GatewayConfigurator for GatewayRegistry {
    fn resolve(&self, name: &GatewayName) -> Result<GatewayClientBox> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| PaymentError::ConfigurationMissing(name.to_string()))
    }
}
