use crate::domain::models::{
    ApplicationRecord, Assets, CreateApplication, PublishConfig, UpdateApplication,
};
use crate::services::marketplace::Marketplace;

/// License content and identifier are immutable once an application exists.
#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    #[error("license of existing application cannot be updated: local LICENSE differs from the published license body")]
    LicenseBodyChanged,
    #[error("license of existing application cannot be updated: local identifier {local} differs from published {remote}")]
    LicenseIdChanged { local: String, remote: String },
    #[error("existing application has no published license to compare against")]
    LicenseUnverifiable,
}

/// Fetch the published license and compare it byte-for-byte against the local
/// one, then compare the identifiers. Any difference refuses the update
/// before a mutating call is made.
pub fn verify_license_unchanged(
    marketplace: &dyn Marketplace,
    record: &ApplicationRecord,
    local_license: &str,
    local_id: &str,
) -> anyhow::Result<()> {
    let url = record
        .license_url
        .as_deref()
        .ok_or(ReconcileError::LicenseUnverifiable)?;
    let published = marketplace.fetch_license(url)?;
    if published != local_license {
        return Err(ReconcileError::LicenseBodyChanged.into());
    }
    match record.spdx_license_id.as_deref() {
        Some(remote) if remote == local_id => Ok(()),
        other => Err(ReconcileError::LicenseIdChanged {
            local: local_id.to_string(),
            remote: other.unwrap_or("none").to_string(),
        }
        .into()),
    }
}

pub fn create_request(config: &PublishConfig, assets: &Assets) -> CreateApplication {
    CreateApplication {
        name: config.name.clone(),
        author: config.author.clone(),
        description: config.description.clone(),
        home_page_url: config.home_page_url.clone(),
        labels: config.labels.clone(),
        readme_body: assets.readme.clone(),
        spdx_license_id: config.spdx_license_id.clone(),
        license_body: assets.license.clone(),
    }
}

pub fn update_request(config: &PublishConfig, assets: &Assets) -> UpdateApplication {
    UpdateApplication {
        author: config.author.clone(),
        description: config.description.clone(),
        home_page_url: config.home_page_url.clone(),
        labels: config.labels.clone(),
        readme_body: assets.readme.clone(),
    }
}
