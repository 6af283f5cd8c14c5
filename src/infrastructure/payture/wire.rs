//! Request encoding and response decoding for the Payture-style API.
//!
//! Every request is a form with two fields: `Key` (the merchant) and `Data`, a
//! `;`-separated list of `Name=Value` pairs whose order and casing the gateway
//! depends on.

use crate::domain::description::PaymentDescription;
use crate::domain::identifiers::SessionId;
use crate::error::{PaymentError, Result};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use std::fmt;
use std::net::IpAddr;

/// Bytes escaped in the product label: controls, space, the URI-unsafe
/// punctuation and everything outside ASCII. Reserved characters such as `:`, `,`
/// and `(` stay literal, as the gateway expects.
const PRODUCT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Init,
    Charge,
    Unblock,
    Refund,
}

impl Operation {
    /// Path segment appended to the gateway base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Init => "Init",
            Operation::Charge => "Charge",
            Operation::Unblock => "Unblock",
            Operation::Refund => "Refund",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub operation: Operation,
    pub data: String,
    pub key: String,
}

impl WireRequest {
    /// Form fields in the order they are posted.
    pub fn form(&self) -> [(&'static str, &str); 2] {
        [("Data", self.data.as_str()), ("Key", self.key.as_str())]
    }
}

/// Joins the present fields as `Name=Value` pairs, skipping absent ones.
///
/// Values are written as given; only the product label is escaped, by
/// [`escape_product`].
pub fn encode_data(fields: &[(&str, Option<String>)]) -> String {
    fields
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|value| format!("{name}={value}")))
        .collect::<Vec<_>>()
        .join(";")
}

pub fn escape_product(product: &str) -> String {
    utf8_percent_encode(product, PRODUCT).to_string()
}

pub fn init_request(
    key: &str,
    order_id: &str,
    amount: i64,
    client_ip: IpAddr,
    description: Option<&PaymentDescription>,
) -> WireRequest {
    let described = description.filter(|d| d.is_sent());
    let data = encode_data(&[
        ("SessionType", Some("Block".to_string())),
        ("OrderId", Some(order_id.to_string())),
        ("Amount", Some(amount.to_string())),
        ("IP", Some(client_ip.to_string())),
        (
            "Product",
            described.and_then(|d| d.product.as_deref()).map(escape_product),
        ),
        // Always paired with Product, empty when no total was given
        (
            "Total",
            described.map(|d| d.total.map(|t| t.to_string()).unwrap_or_default()),
        ),
        ("TemplateTag", described.and_then(|d| d.template_tag.clone())),
        ("Language", described.and_then(|d| d.language.clone())),
    ]);

    WireRequest {
        operation: Operation::Init,
        data,
        key: key.to_string(),
    }
}

/// The session id travels under the `Password` field name.
pub fn charge_request(key: &str, order_id: &str, session_id: &SessionId) -> WireRequest {
    WireRequest {
        operation: Operation::Charge,
        data: encode_data(&[
            ("OrderId", Some(order_id.to_string())),
            ("Password", Some(session_id.to_string())),
        ]),
        key: key.to_string(),
    }
}

pub fn unblock_request(key: &str, order_id: &str, amount: i64) -> WireRequest {
    amount_request(Operation::Unblock, key, order_id, amount)
}

pub fn refund_request(key: &str, order_id: &str, amount: i64) -> WireRequest {
    amount_request(Operation::Refund, key, order_id, amount)
}

fn amount_request(operation: Operation, key: &str, order_id: &str, amount: i64) -> WireRequest {
    WireRequest {
        operation,
        data: encode_data(&[
            ("OrderId", Some(order_id.to_string())),
            ("Amount", Some(amount.to_string())),
        ]),
        key: key.to_string(),
    }
}

// e.g. <Init Success="True" OrderId="..." Amount="12345" SessionId="..."/>
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "@Success")]
    success: String,
    #[serde(rename = "@SessionId", default)]
    session_id: Option<String>,
    #[serde(rename = "@ErrCode", default)]
    err_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub success: bool,
    pub session_id: Option<SessionId>,
    pub err_code: Option<String>,
}

pub fn decode_response(body: &str) -> Result<GatewayResponse> {
    let raw: RawResponse = quick_xml::de::from_str(body).map_err(|e| {
        PaymentError::GatewayError(format!("unreadable gateway response: {e}"))
    })?;

    let success = if raw.success.eq_ignore_ascii_case("true") {
        true
    } else if raw.success.eq_ignore_ascii_case("false") {
        false
    } else {
        return Err(PaymentError::GatewayError(format!(
            "unexpected Success value '{}'",
            raw.success
        )));
    };

    Ok(GatewayResponse {
        success,
        session_id: raw.session_id.map(SessionId::new),
        err_code: raw.err_code,
    })
}
