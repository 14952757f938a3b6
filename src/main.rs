use clap::Parser;

mod api;
mod cli;
mod commands;
mod domain;
mod services;

use cli::{Cli, Commands};
use domain::errors::AppError;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        report_error(cli.json, &err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let base = services::storage::config_dir()?;
    let config = services::storage::load_config(&base)?;
    let source = cli
        .api
        .clone()
        .or_else(|| config.general.api.clone())
        .unwrap_or_else(|| api::DEFAULT_API_SOURCE.to_string());
    let timeout_ms = config.general.timeout_ms.unwrap_or(api::DEFAULT_TIMEOUT_MS);

    match &cli.command {
        Commands::Login { .. }
        | Commands::Register { .. }
        | Commands::Logout
        | Commands::Status => commands::auth::handle(cli, &base, &source, timeout_ms),
        Commands::Stock { command } => {
            commands::stock::handle(cli, command, &base, &source, timeout_ms)
        }
        Commands::Shelf { command } => {
            commands::shelf::handle(cli, command, &base, &source, timeout_ms)
        }
        Commands::Product { command } => {
            commands::product::handle(cli, command, &base, &source, timeout_ms)
        }
        Commands::Template { command } => {
            commands::product::handle_templates(cli, command, &base, &source, timeout_ms)
        }
        Commands::Draft { command } => {
            commands::draft::handle(cli, command, &base, &source, timeout_ms)
        }
    }
}

fn report_error(json: bool, err: &anyhow::Error) {
    let code = err
        .downcast_ref::<AppError>()
        .map(AppError::code)
        .unwrap_or("ERROR");
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": false,
                "error": { "code": code, "message": err.to_string() }
            })
        );
    } else {
        eprintln!("error: {err}");
    }
}
