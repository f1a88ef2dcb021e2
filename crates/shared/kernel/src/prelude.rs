pub use crate::loader::{LoadError, read_jsonl};
pub use crate::query::{FilterCriteria, RecordQuery};
pub use crate::record::{Record, RecordCollection};
pub use crate::store::RecordStore;
pub use billmock_domain::config::ApiConfig;
pub use billmock_domain::entity::Entity;

#[cfg(feature = "server")]
pub use crate::server::AppState;
