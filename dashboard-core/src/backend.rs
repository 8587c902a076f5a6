use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config, DashboardError,
    model::{Suggestion, WeatherPayload},
};

pub mod http;

pub use http::HttpBackend;

/// The service answering city lookups and autocomplete queries.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// Current conditions plus past and future days for `city`, passed through verbatim.
    async fn weather(&self, city: &str) -> Result<WeatherPayload, DashboardError>;

    /// Candidate cities for a partial query.
    async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>, DashboardError>;
}

/// Construct the HTTP backend described by `config`.
pub fn backend_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherBackend>> {
    let backend = HttpBackend::new(&config.backend_url, config.timeout())?;
    Ok(Arc::new(backend))
}
