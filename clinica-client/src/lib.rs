//! clinica-client - HTTP services and client state for the clinic backends
//!
//! Talks to the pacientes, consultas and orquestador services over JSON,
//! and keeps per-entity list state with ordered, cancellable updates.

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod screen;
pub mod services;
pub mod session;
pub mod store;
pub mod submit;
pub mod token;

pub use app::{App, AppError};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind, Result, StoreError};
pub use http::{ConnectionReport, HttpClient, Service};
pub use screen::{ListScreen, Modal};
pub use services::{ResourceService, Searchable, StatusService};
pub use session::AuthSession;
pub use store::{ContactoStore, ContactoView, OrquestadorStore, ResourceStore};
pub use submit::{FormSubmitter, SubmitError};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
