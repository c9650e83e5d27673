// cfops-api: Async Rust client for the Cloud Foundry v2 endpoints cfops drives

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{CloudFoundryClient, RouteQuery};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
