use crate::cli::Cli;
use crate::domain::constants::PACKAGED_TEMPLATE_FILE;
use crate::domain::models::{JsonOut, PackageReport};
use crate::services::config::load_config;
use crate::services::marketplace::{HttpMarketplace, find_application};
use crate::services::output::{print_one, progress};
use crate::services::packager::{install_dependencies, package_template};

/// Run the packaging half of the pipeline and leave the result on disk.
pub fn handle_package(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config)?;

    progress(cli.json, "Installing dependencies...");
    install_dependencies()?;

    progress(cli.json, "Packaging template...");
    let body = package_template(&config.profile, &config.bucket)?;
    std::fs::write(PACKAGED_TEMPLATE_FILE, &body)?;

    let report = PackageReport {
        path: PACKAGED_TEMPLATE_FILE.to_string(),
        bytes: body.len(),
    };
    print_one(cli.json, report, |r| {
        format!("wrote {} ({} bytes)", r.path, r.bytes)
    })
}

/// Resolve an application by name and print its record.
pub fn handle_show(cli: &Cli, name: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(&cli.config)?;
    let target = name.unwrap_or(&config.name);

    let marketplace = HttpMarketplace::connect(&config.profile, &config.region)?;
    let Some(record) = find_application(&marketplace, target)? else {
        anyhow::bail!("application not found: {target}");
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: record
            })?
        );
    } else {
        println!("id: {}", record.id);
        println!("name: {}", record.name);
        println!("author: {}", record.author);
        println!("description: {}", record.description);
        println!(
            "latest_version: {}",
            record.latest_version.unwrap_or_else(|| "n/a".to_string())
        );
        if !record.labels.is_empty() {
            println!("labels: {}", record.labels.join(", "));
        }
    }
    Ok(())
}
