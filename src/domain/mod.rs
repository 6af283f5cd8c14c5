//! Domain layer: payment states, value objects and the gateway ports.

pub mod amount;
pub mod description;
pub mod identifiers;
pub mod payment;
pub mod ports;
