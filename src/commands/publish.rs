use std::thread;

use crate::cli::Cli;
use crate::domain::models::PublishReport;
use crate::services::config::{load_assets, load_config};
use crate::services::marketplace::{HttpMarketplace, Marketplace, find_application};
use crate::services::output::{print_one, progress};
use crate::services::packager::{install_dependencies, package_template};
use crate::services::reconcile::{create_request, update_request, verify_license_unchanged};
use crate::services::release::publish_version;
use crate::services::visibility::{PolicyOutcome, grant_public_deploy};

/// The full pipeline: package assets, reconcile the remote application,
/// publish a new version, optionally grant public deploy access. Strictly
/// sequential; the first failure aborts the run.
pub fn handle_publish(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config)?;

    progress(cli.json, "Installing dependencies...");
    install_dependencies()?;

    progress(cli.json, "Packaging template...");
    let template_body = package_template(&config.profile, &config.bucket)?;

    let assets = load_assets()?;
    let marketplace = HttpMarketplace::connect(&config.profile, &config.region)?;

    let (application, action) = match find_application(&marketplace, &config.name)? {
        Some(found) => {
            verify_license_unchanged(
                &marketplace,
                &found,
                &assets.license,
                &config.spdx_license_id,
            )?;
            progress(cli.json, "Updating application...");
            let updated =
                marketplace.update_application(&found.id, &update_request(&config, &assets))?;
            (updated, "updated")
        }
        None => {
            progress(cli.json, "Creating application...");
            let created = marketplace.create_application(&create_request(&config, &assets))?;
            (created, "created")
        }
    };

    progress(
        cli.json,
        &format!("Publishing version {}...", config.semantic_version),
    );
    let version = publish_version(&marketplace, &application, &config, template_body)?;

    let visibility = if config.public {
        progress(cli.json, "Granting public deploy access...");
        match grant_public_deploy(
            &marketplace,
            &application.id,
            &version.semantic_version,
            thread::sleep,
        )? {
            PolicyOutcome::Granted => "public",
            PolicyOutcome::Deferred(message) => {
                progress(cli.json, &format!("warning: {message}"));
                "pending"
            }
        }
    } else {
        "private"
    };

    let report = PublishReport {
        application_id: application.id,
        name: application.name,
        semantic_version: version.semantic_version,
        action: action.to_string(),
        visibility: visibility.to_string(),
    };
    print_one(cli.json, report, |r| {
        format!(
            "published {} {} ({}, {})",
            r.name, r.semantic_version, r.action, r.visibility
        )
    })
}
