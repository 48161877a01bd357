//! Transient state used by the service.
//!
//! This is initialized on startup.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, Instrument};

use envsensor_configuration::Configuration;
use query_engine_execution::memory::InMemoryStore;
use query_engine_execution::metrics;
use query_engine_execution::store::RecordStore;

/// State for our service.
#[derive(Clone)]
pub struct State {
    pub metrics: metrics::Metrics,
    pub store: Arc<dyn RecordStore>,
}

/// Set up metrics and open the record store.
///
/// A relative data file is looked up in the configuration directory. Without a
/// data file the service starts with an empty store.
pub async fn create_state(
    configuration_dir: impl AsRef<Path>,
    configuration: &Configuration,
    metrics_registry: &mut prometheus::Registry,
) -> Result<State, InitializationError> {
    let metrics = async {
        let metrics_inner = metrics::Metrics::initialize(metrics_registry)
            .map_err(InitializationError::MetricsError)?;
        Ok(metrics_inner)
    }
    .instrument(info_span!("Setup metrics"))
    .await?;

    let store = match &configuration.data_file {
        Some(data_file) => {
            let path = configuration_dir.as_ref().join(data_file);
            InMemoryStore::load_from_file(&path)
                .instrument(info_span!("Load records"))
                .await
                .map_err(InitializationError::UnableToLoadRecords)?
        }
        None => InMemoryStore::new(),
    };

    Ok(State {
        metrics,
        store: Arc::new(store),
    })
}

/// State initialization error.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("unable to load records: {0}")]
    UnableToLoadRecords(query_engine_execution::error::Error),
    #[error("error initializing metrics: {0}")]
    MetricsError(prometheus::Error),
}
