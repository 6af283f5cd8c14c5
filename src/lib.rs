//! Lifecycle core for a single gateway payment.
//!
//! A payment moves New → Prepared → Blocked → Charged → Refunded, or
//! Blocked → Cancelled. Each state is its own type exposing only the transitions
//! legal from it, and every gateway call goes through a client resolved from the
//! [`GatewayConfigurator`](domain::ports::GatewayConfigurator) passed in by the caller.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
