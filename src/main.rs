use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod domain;
mod services;

pub(crate) use cli::{Cli, Commands, InsightsView};
pub(crate) use commands::{handle_info_commands, handle_runtime_commands};
pub(crate) use domain::errors::error_code;
pub(crate) use domain::models::{AboutReport, InsightsReport, ModelReport};
pub(crate) use domain::patient::PatientInput;
pub(crate) use services::artifact::{shared_artifact, shared_cache};
pub(crate) use services::assessment::{assess, render_report};
pub(crate) use services::config::{load_config, resolve_settings, Settings};
pub(crate) use services::dataset::{build_insights, load_dataset};
pub(crate) use services::inference::Classifier;
pub(crate) use services::output::{print_error, print_one};
pub(crate) use services::session::run_session;

fn main() -> ExitCode {
    let cli = Cli::parse();
    services::logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = error_code(&err);
            tracing::debug!(code, "command failed");
            print_error(cli.json, code, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config()?;
    let settings = resolve_settings(&config, cli.model.as_deref(), cli.dataset.as_deref());
    tracing::debug!(?settings, "resolved settings");

    if handle_runtime_commands(cli, &settings)? {
        return Ok(());
    }
    if handle_info_commands(cli, &settings)? {
        return Ok(());
    }
    anyhow::bail!("unhandled command")
}
