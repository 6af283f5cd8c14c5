#![allow(dead_code)]

use paystate::domain::amount::Amount;
use paystate::domain::payment::PaymentNew;
use paystate::infrastructure::registry::GatewayRegistry;
use paystate::infrastructure::stub::StubGatewayClient;
use rust_decimal_macros::dec;
use std::net::IpAddr;

pub const MERCHANT_KEY: &str = "MerchantRutravel";

pub fn random_order_id() -> String {
    format!("order-{}", rand::random::<u64>())
}

pub fn client_ip() -> IpAddr {
    "123.45.67.89".parse().unwrap()
}

pub fn new_payment(gateway: &str, order_id: &str) -> PaymentNew {
    PaymentNew::new(
        gateway,
        order_id,
        Amount::new(dec!(123.45)).unwrap(),
        client_ip(),
    )
}

pub fn stub_registry(stub: &StubGatewayClient) -> GatewayRegistry {
    let mut registry = GatewayRegistry::new();
    registry.register_client("default", stub.clone());
    registry
}

/// Decodes a recorded form body into its fields, in posted order.
pub fn form_fields(request: &wiremock::Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}
