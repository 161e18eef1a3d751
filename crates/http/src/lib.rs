//! Backoffice API client
//!
//! Session handling, an authenticated request pipeline, typed person and
//! product services and a background health monitor for the backoffice REST
//! API.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod health;
pub mod messages;
pub mod query;
pub mod session;
pub mod types;
pub mod validation;

pub use client::error::{ApiError, ClientError, ErrorKind, TransportError};
pub use client::{ApiClient, ApiClientBuilder};
pub use health::{HealthMonitor, HealthSnapshot, HealthState};
pub use messages::Locale;
pub use session::navigator::{Navigator, NoopNavigator, Route};
pub use session::store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use session::SessionManager;
pub use validation::ValidationErrors;
