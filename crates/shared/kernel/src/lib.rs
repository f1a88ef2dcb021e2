//! Kernel of the billing mock API.
//!
//! Holds everything between the JSONL files and the HTTP handlers:
//! the open-schema [`record::Record`], the [`loader`] for line-delimited JSON,
//! the [`store::RecordStore`] with its four collections, and the [`query`] engine.
//! With the `server` feature it also provides the axum state and `OpenAPI`-annotated routers.
//!
//! ## Querying a collection
//! ```rust
//! use billmock_kernel::prelude::*;
//! use serde_json::json;
//!
//! let records: Vec<Record> = [json!({"id": 1, "status": "active"}), json!({"id": 2, "status": "past_due"})]
//!     .into_iter()
//!     .map(|v| Record::try_from(v).unwrap())
//!     .collect();
//!
//! let query = RecordQuery::from_params([("status", "active")]);
//! assert_eq!(query.apply(&records), vec![&records[0]]);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use billmock_kernel::config::load_config;
//! use billmock_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("billmock.toml"))?;
//! ```
pub mod config;
pub mod loader;
pub mod prelude;
pub mod query;
pub mod record;
#[cfg(feature = "server")]
pub mod server;
pub mod store;

pub use billmock_domain as domain;
