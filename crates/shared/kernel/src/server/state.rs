use billmock_domain::error::format_context;
use crate::store::RecordStore;
use axum::extract::FromRef;
use billmock_domain::config::ApiConfig;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct AppStateInner {
    pub config: ApiConfig,
    pub store: RecordStore,
}

/// Request-scoped view of the application: configuration plus the record store.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<AppState> for ApiConfig {
    fn from_ref(state: &AppState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<AppState> for RecordStore {
    fn from_ref(state: &AppState) -> Self {
        state.inner.store.clone()
    }
}

#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    store: Option<RecordStore>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shares an existing store; a fresh empty one is created otherwise.
    #[must_use]
    pub fn store(mut self, store: RecordStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<AppState, AppStateError> {
        let config = self.config.ok_or_else(|| AppStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;
        let store = self.store.unwrap_or_default();

        Ok(AppState { inner: Arc::new(AppStateInner { config, store }) })
    }
}
