use std::path::Path;
use std::process::Command;

use anyhow::Context;

use crate::domain::constants::{FUNCTIONS_DIR, INSTALL_COMMAND, PACKAGE_COMMAND, TEMPLATE_FILE};

/// Install function dependencies in the fixed functions directory. The
/// installer inherits stdio, so on failure its own diagnostics reach the
/// user unfiltered.
pub fn install_dependencies() -> anyhow::Result<()> {
    let dir = Path::new(FUNCTIONS_DIR);
    if !dir.is_dir() {
        anyhow::bail!("dependency directory {FUNCTIONS_DIR} not found");
    }
    let status = Command::new(INSTALL_COMMAND)
        .arg("install")
        .current_dir(dir)
        .status()?;
    if !status.success() {
        anyhow::bail!("{INSTALL_COMMAND} install failed with {status}");
    }
    Ok(())
}

/// Run the external packager, which uploads local artifacts to the bucket and
/// rewrites the template to reference them. Its stdout is the packaged
/// template, preceded by a one-line informational banner.
pub fn package_template(profile: &str, bucket: &str) -> anyhow::Result<String> {
    let output = Command::new(PACKAGE_COMMAND)
        .args([
            "package",
            "--profile",
            profile,
            "--template-file",
            TEMPLATE_FILE,
            "--bucket",
            bucket,
        ])
        .output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{PACKAGE_COMMAND} package failed: {}", stderr.trim());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let body = strip_banner(&stdout)?;
    ensure_template_document(&body)?;
    Ok(body)
}

/// Discard the banner line no matter what it contains; only line two onward
/// is the document.
fn strip_banner(stdout: &str) -> anyhow::Result<String> {
    let body = stdout.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    if body.trim().is_empty() {
        anyhow::bail!("{PACKAGE_COMMAND} produced no template output");
    }
    Ok(body.to_string())
}

/// Any string is a valid YAML scalar, so require a mapping at the top level
/// before shipping the body to the repository.
fn ensure_template_document(body: &str) -> anyhow::Result<()> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(body).context("packaged template is not valid YAML")?;
    if !doc.is_mapping() {
        anyhow::bail!("packaged template is not a YAML mapping");
    }
    Ok(())
}
