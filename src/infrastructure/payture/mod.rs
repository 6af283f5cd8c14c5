//! Wire client for the Payture-style gateway family.

pub mod client;
pub mod wire;
