//! HTTP surface of the kernel: shared state, collection handlers, health probe.

mod health;
mod records;
pub mod router;
mod state;

pub use health::{CollectionStatus, HealthResponse};
pub use state::{AppState, AppStateBuilder, AppStateError, AppStateInner};
