//! Fintra Client - Remote Data Access
//!
//! The [`RemoteDataService`] contract plus a reqwest-backed [`RestClient`]
//! that speaks the managed backend's table and RPC dialect.

pub mod config;
pub mod receipt;
pub mod rest;
pub mod service;

pub use config::{AuthConfig, ClientConfig};
pub use receipt::{prefill_draft, ReceiptExtractor};
pub use rest::RestClient;
pub use service::{RemoteDataService, RemoteResult};
