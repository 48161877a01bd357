//! The CLI can do a few things. This provides a central point where those things are routed and
//! then done, making it easier to test this crate deterministically.

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use envsensor_configuration as configuration;
use envsensor_configuration::environment::Environment;
use envsensor_service::error::Error;
use envsensor_service::service::{RecordService, ServiceSetup};
use query_engine_translation::translation::params::QueryParams;
use query_engine_translation::translation::query::translate;

/// The various contextual bits and bobs we need to run.
pub struct Context<Env: Environment> {
    pub context_path: PathBuf,
    pub environment: Env,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a default configuration, and the schema of its format.
    Initialize,
    /// Print the store query compiled from a query string, without running it.
    Translate {
        /// e.g. `city=Pune&no_min=10&sort=-no`
        query: String,
    },
    /// List the records matching a query string.
    Query {
        #[arg(default_value = "")]
        query: String,
    },
    /// Fetch one record by its identifier.
    Get { id: String },
    /// Print statistics over every record.
    Stats,
}

/// What a command printed, and whether it succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub value: serde_json::Value,
    pub success: bool,
}

/// Run a command in a given directory.
pub async fn run(command: Command, context: Context<impl Environment>) -> anyhow::Result<Output> {
    match command {
        Command::Initialize => initialize(context).await,
        Command::Translate { query } => translate_query(context, &query).await,
        Command::Query { query } => {
            let service = service(context).await?;
            let params = QueryParams::from_query_string(&query);
            Ok(envelope(service.list_records(&params).await))
        }
        Command::Get { id } => {
            let service = service(context).await?;
            Ok(envelope(service.get_record(&id).await))
        }
        Command::Stats => {
            let service = service(context).await?;
            Ok(envelope(service.stats().await))
        }
    }
}

/// Initialize an empty directory with a default configuration.
///
/// An existing configuration is left alone.
async fn initialize(context: Context<impl Environment>) -> anyhow::Result<Output> {
    let configuration_file = context
        .context_path
        .join(configuration::CONFIGURATION_FILENAME);
    if configuration_file.exists() {
        anyhow::bail!(
            "a configuration already exists at {}",
            configuration_file.display()
        );
    }

    configuration::write_parsed_configuration(
        configuration::ParsedConfiguration::initial(),
        &context.context_path,
    )
    .await?;

    Ok(Output {
        value: serde_json::json!({ "configuration": configuration_file.display().to_string() }),
        success: true,
    })
}

async fn translate_query(context: Context<impl Environment>, query: &str) -> anyhow::Result<Output> {
    let configuration = ServiceSetup::new(context.environment)
        .parse_configuration(&context.context_path)
        .await?;
    let params = QueryParams::from_query_string(query);
    match translate(&configuration.metadata, &params) {
        Ok(plan) => Ok(Output {
            value: serde_json::json!({
                "query": plan.query.to_document(),
                "warnings": plan.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            success: true,
        }),
        Err(err) => Ok(envelope::<()>(Err(Error::from(err)))),
    }
}

async fn service(context: Context<impl Environment>) -> anyhow::Result<RecordService> {
    let service = ServiceSetup::new(context.environment)
        .build(&context.context_path, &mut prometheus::Registry::new())
        .await?;
    Ok(service)
}

/// Service errors are answers too: print their envelope and report failure.
fn envelope<T: Serialize>(
    result: Result<envsensor_service::envelope::Envelope<T>, Error>,
) -> Output {
    let (value, success) = match result {
        Ok(envelope) => (serde_json::to_value(envelope), true),
        Err(err) => (serde_json::to_value(err.to_envelope()), false),
    };
    match value {
        Ok(value) => Output { value, success },
        Err(err) => Output {
            value: serde_json::json!({ "success": false, "message": err.to_string() }),
            success: false,
        },
    }
}
