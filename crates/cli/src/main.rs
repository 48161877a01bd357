//! The envsensor command line.
//!
//! Reads the configuration directory, then runs one command against the
//! configured record store and prints the JSON answer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use envsensor_cli::{run, Command, Context};
use envsensor_configuration::environment::ProcessEnvironment;

/// The command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "envsensor", about = "Query environmental sensor records", version)]
pub struct Args {
    /// The configuration directory.
    #[arg(long = "configuration", env = "ENVSENSOR_CONFIGURATION_DIR", default_value = ".")]
    pub context_path: PathBuf,
    /// The command to invoke.
    #[command(subcommand)]
    pub subcommand: Command,
}

/// The entrypoint. Logs go to stderr, filtered by `RUST_LOG`.
#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let context = Context {
        context_path: args.context_path,
        environment: ProcessEnvironment,
    };

    match run(args.subcommand, context).await {
        Ok(output) => {
            match serde_json::to_string_pretty(&output.value) {
                Ok(text) => println!("{text}"),
                Err(error) => eprintln!("{error}"),
            }
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
