use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

use cli::{Cli, Commands};
use services::marketplace::ServiceError;
use services::reconcile::ReconcileError;
use services::release::ReleaseError;

fn main() {
    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Publish => commands::handle_publish(&cli),
        Commands::Package => commands::handle_package(&cli),
        Commands::Show { name } => commands::handle_show(&cli, name.as_deref()),
    };
    if let Err(err) = result {
        report_failure(cli.json, &err);
        std::process::exit(1);
    }
}

fn report_failure(json: bool, err: &anyhow::Error) {
    if json {
        let envelope = serde_json::json!({
            "ok": false,
            "error": {
                "code": error_code(err),
                "message": format!("{err:#}"),
            }
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| envelope.to_string())
        );
    } else {
        eprintln!("error: {err:#}");
    }
}

/// Stable codes for the closed failure classes; everything else is ERROR.
fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ReconcileError>().is_some() {
        "LICENSE_MISMATCH"
    } else if err.downcast_ref::<ReleaseError>().is_some() {
        "VERSION_EXISTS"
    } else if let Some(service) = err.downcast_ref::<ServiceError>() {
        service.kind.label()
    } else {
        "ERROR"
    }
}
