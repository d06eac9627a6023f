//! Infrastructure provider for the todo API.
//!
//! # Overview
//! Exposes one resource, `todo_todo`, and one data source, `todo_todos`,
//! through the Hemmer provider protocol. The provider resolves the API host
//! from its `host` attribute or the `TODO_HOST` environment variable and
//! shares one `ApiClient` with every call it serves.
//!
//! # Design
//! - `TodoProvider` implements `ProviderService` and dispatches by type name
//!   to `todo_resource` and `todos_data_source`.
//! - Schemas, validation and plan diffs come from `hemmer_provider_sdk`;
//!   `plan` adds defaults, enumerated values and prior-state carry-over.
//! - `ApiClient` performs blocking HTTP round-trips on the runtime's blocking
//!   pool; request shaping and status handling stay in `todo-core`.
//! - Every lifecycle call either fully succeeds or fails. Nothing is retried.

pub mod client;
pub mod error;
pub mod plan;
pub mod provider;
pub mod todo_resource;
pub mod todos_data_source;

pub use client::ApiClient;
pub use error::ClientError;
pub use provider::{TodoProvider, HOST_ENV_VAR};
pub use todos_data_source::TODOS_ID_PLACEHOLDER;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
