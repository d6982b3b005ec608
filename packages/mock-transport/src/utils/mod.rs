// packages/mock-transport/src/utils/mod.rs
//! Shared utilities: error types and configuration loading.

pub mod config;
pub mod errors;

pub use self::config::{TransportConfig, UnregisteredOriginPolicy};
pub use self::errors::{Result, TransportError};
