//! The record service and how it is set up.
//!
//! Every operation answers with an envelope, or an error carrying the envelope
//! to answer with. Failures are logged here.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info_span, Instrument};

use envsensor_configuration as configuration;
use envsensor_configuration::environment::Environment;
use query_engine_metadata::metadata::Document;
use query_engine_translation::translation::params::QueryParams;

use crate::envelope::Envelope;
use crate::error::{Error, ErrorKind};
use crate::mutation::{self, CreatedRecords, DeletedRecord, DeletedRecords};
use crate::query::{self, RecordPage, SingleRecord};
use crate::state::{self, InitializationError};
use crate::stats::{self, Stats};

pub struct RecordService {
    /// The resolved configuration
    configuration: Arc<configuration::Configuration>,
    /// The unserializable, transient state
    state: Arc<state::State>,
}

impl RecordService {
    pub fn new(configuration: Arc<configuration::Configuration>, state: Arc<state::State>) -> Self {
        RecordService {
            configuration,
            state,
        }
    }

    pub fn configuration(&self) -> &configuration::Configuration {
        &self.configuration
    }

    pub fn state(&self) -> &state::State {
        &self.state
    }

    /// List records matching the query parameters.
    pub async fn list_records(&self, params: &QueryParams) -> Result<Envelope<RecordPage>, Error> {
        query::list_records(&self.configuration, &self.state, params)
            .instrument(info_span!("List records"))
            .await
            .map_err(|err| log_error("List records error", err))
    }

    pub async fn get_record(&self, id: &str) -> Result<Envelope<SingleRecord>, Error> {
        query::get_record(&self.state, id)
            .instrument(info_span!("Get record"))
            .await
            .map_err(|err| log_error("Get record error", err))
    }

    pub async fn create_record(&self, input: &Document) -> Result<Envelope<SingleRecord>, Error> {
        mutation::create_record(&self.state, input)
            .instrument(info_span!("Create record"))
            .await
            .map_err(|err| log_error("Create record error", err))
    }

    pub async fn create_records(
        &self,
        inputs: &[Document],
    ) -> Result<Envelope<CreatedRecords>, Error> {
        mutation::create_records(&self.configuration, &self.state, inputs)
            .instrument(info_span!("Create records"))
            .await
            .map_err(|err| log_error("Bulk create error", err))
    }

    pub async fn update_record(
        &self,
        id: &str,
        input: &Document,
    ) -> Result<Envelope<SingleRecord>, Error> {
        mutation::update_record(&self.state, id, input)
            .instrument(info_span!("Update record"))
            .await
            .map_err(|err| log_error("Update record error", err))
    }

    pub async fn delete_record(&self, id: &str) -> Result<Envelope<DeletedRecord>, Error> {
        mutation::delete_record(&self.state, id)
            .instrument(info_span!("Delete record"))
            .await
            .map_err(|err| log_error("Delete record error", err))
    }

    pub async fn delete_records(&self, ids: &[String]) -> Result<Envelope<DeletedRecords>, Error> {
        mutation::delete_records(&self.state, ids)
            .instrument(info_span!("Delete records"))
            .await
            .map_err(|err| log_error("Bulk delete error", err))
    }

    pub async fn stats(&self) -> Result<Envelope<Stats>, Error> {
        stats::stats(&self.state)
            .instrument(info_span!("Stats"))
            .await
            .map_err(|err| log_error("Stats error", err))
    }
}

// Client mistakes are part of normal operation and only store failures are
// logged as errors.
fn log_error(event: &'static str, err: Error) -> Error {
    match err.kind() {
        ErrorKind::Internal => tracing::error!(
            meta.signal_type = "log",
            event.domain = "envsensor",
            event.name = event,
            name = event,
            body = %err,
            error = true,
        ),
        ErrorKind::BadRequest | ErrorKind::NotFound => {
            tracing::info!(event.name = event, body = %err, "request refused");
        }
    }
    err
}

/// Reads the configuration directory and builds a ready service.
pub struct ServiceSetup<Env: Environment> {
    environment: Env,
}

impl<Env: Environment> ServiceSetup<Env> {
    pub fn new(environment: Env) -> Self {
        Self { environment }
    }

    /// Validate the configuration provided by the user and resolve its
    /// environment variables.
    pub async fn parse_configuration(
        &self,
        configuration_dir: impl AsRef<Path>,
    ) -> Result<configuration::Configuration, SetupError> {
        // Validation errors are only warned about where they are found: they
        // are the user's to fix, not a failure of the process.
        let parsed_configuration = configuration::parse_configuration(configuration_dir)
            .instrument(info_span!("parse configuration"))
            .await?;

        let runtime_configuration =
            configuration::make_runtime_configuration(parsed_configuration, &self.environment)?;

        Ok(runtime_configuration)
    }

    /// Initialize the service's in-memory state, and register its metrics.
    pub async fn try_init_state(
        &self,
        configuration_dir: impl AsRef<Path>,
        configuration: &configuration::Configuration,
        metrics: &mut prometheus::Registry,
    ) -> Result<state::State, SetupError> {
        state::create_state(configuration_dir, configuration, metrics)
            .instrument(info_span!("Initialise state"))
            .await
            .map_err(|err| {
                tracing::error!(
                    meta.signal_type = "log",
                    event.domain = "envsensor",
                    event.name = "Initialization error",
                    name = "Initialization error",
                    body = %err,
                    error = true,
                );
                SetupError::Initialization(err)
            })
    }

    /// Both steps, in order.
    pub async fn build(
        &self,
        configuration_dir: impl AsRef<Path>,
        metrics: &mut prometheus::Registry,
    ) -> Result<RecordService, SetupError> {
        let configuration_dir = configuration_dir.as_ref();
        let configuration = self.parse_configuration(configuration_dir).await?;
        let state = self
            .try_init_state(configuration_dir, &configuration, metrics)
            .await?;
        Ok(RecordService::new(Arc::new(configuration), Arc::new(state)))
    }
}

/// Service setup error.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{0}")]
    ParseConfiguration(#[from] configuration::error::ParseConfigurationError),
    #[error("{0}")]
    MakeRuntimeConfiguration(#[from] configuration::error::MakeRuntimeConfigurationError),
    #[error("{0}")]
    Initialization(InitializationError),
}
