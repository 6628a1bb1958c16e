mod config;
mod telemetry;

use clap::{Args, Parser};
use collection::Collection;
use config::{Config, ConfigError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "GraphQL gateway for the Met Museum collection API")]
enum CliCommand {
    /// Serve the GraphQL API and the admin probes
    Serve(ConfigArgs),
    /// Load and validate a config file, then exit
    CheckConfig(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long, env = "METGQL_CONFIG")]
    config_file: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Api(#[from] api::ApiError),
}

fn main() -> ExitCode {
    let cli = CliCommand::parse();

    let result = match cli {
        CliCommand::Serve(args) => serve(args),
        CliCommand::CheckConfig(args) => check_config(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("metgql: {e}");
            ExitCode::FAILURE
        }
    }
}

fn check_config(args: ConfigArgs) -> Result<(), CliError> {
    Config::from_file(&args.config_file)?;
    println!("{} is valid", args.config_file.display());
    Ok(())
}

fn serve(args: ConfigArgs) -> Result<(), CliError> {
    let config = Config::from_file(&args.config_file)?;
    let _telemetry = telemetry::init(&config.common)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let collection = Collection::from_config(&config.collection);
        tracing::info!(
            upstream = %config.collection.upstream.base_url,
            "starting metgql"
        );

        tokio::select! {
            result = api::run(config.api, collection) => result?,
            _ = tokio::signal::ctrl_c() => tracing::info!("received ctrl-c, shutting down"),
        }
        Ok::<_, CliError>(())
    })
}
