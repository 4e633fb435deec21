// technitium-api: Async Rust client for the Technitium DNS Server HTTP API

pub mod apps;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod records;
pub mod transport;
pub mod zones;

pub use client::{Client, QueryParams};
pub use config::ClientConfig;
pub use error::Error;
