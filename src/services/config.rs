use std::path::PathBuf;

use anyhow::Context;

use crate::domain::constants::{LICENSE_FILE, PROFILES_FILE, README_FILE};
use crate::domain::models::{Assets, Profile, ProfilesFile, PublishConfig};

/// Read and validate the publish configuration. Everything is checked here so
/// the pipeline never trips over a missing key mid-run.
pub fn load_config(path: &str) -> anyhow::Result<PublishConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read configuration file {path}"))?;
    parse_config(&raw).with_context(|| format!("invalid configuration in {path}"))
}

fn parse_config(raw: &str) -> anyhow::Result<PublishConfig> {
    let config: PublishConfig = serde_yaml::from_str(raw)?;
    if config.name.trim().is_empty() {
        anyhow::bail!("application name must not be empty");
    }
    semver::Version::parse(&config.semantic_version)
        .with_context(|| format!("invalid semantic version {:?}", config.semantic_version))?;
    Ok(config)
}

/// Load the README and license documents from their fixed relative paths.
pub fn load_assets() -> anyhow::Result<Assets> {
    let readme = std::fs::read_to_string(README_FILE)
        .with_context(|| format!("cannot read {README_FILE}"))?;
    let license = std::fs::read_to_string(LICENSE_FILE)
        .with_context(|| format!("cannot read {LICENSE_FILE}"))?;
    Ok(Assets { readme, license })
}

/// Resolve a credential profile from `~/.config/sarp/profiles.toml`.
pub fn load_profile(name: &str) -> anyhow::Result<Profile> {
    let home = std::env::var("HOME")?;
    let path = PathBuf::from(home).join(PROFILES_FILE);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read credential profiles at {}", path.display()))?;
    select_profile(&raw, name)
}

fn select_profile(raw: &str, name: &str) -> anyhow::Result<Profile> {
    let file: ProfilesFile = toml::from_str(raw)?;
    file.profiles
        .get(name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("unknown credential profile: {name}"))
}
