// Client side of the legal Q&A backend: request/response types, endpoint
// configuration and the reqwest-backed client.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use client::{ApiClient, QueryBackend};
pub use config::ApiConfig;
pub use error::RequestError;
pub use protocol::{MAX_K, MIN_K};
