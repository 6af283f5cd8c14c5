pub mod payture;
pub mod registry;
pub mod stub;
