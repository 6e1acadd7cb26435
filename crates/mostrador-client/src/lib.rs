//! # mostrador-client: Backend Client
//!
//! Typed access to the backend REST API, the client configuration, and the
//! catalog session used for price-band assignment.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        mostrador-client                                 │
//! │                                                                         │
//! │   ClientConfig ──► ApiClient ──(reqwest)──► backend /api/*             │
//! │   (TOML + env)         │                                                │
//! │                        ▼                                                │
//! │                 CatalogSession ──► PriceBandAssigner (core)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - TOML configuration with environment overrides
//! - [`http`] - REST client
//! - [`session`] - Catalog + ranges loaded once per session
//! - [`error`] - Client error types

pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, ExportOutcome};
pub use session::CatalogSession;
