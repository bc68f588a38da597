use crate::domain::models::{ApplicationRecord, CreateVersion, PublishConfig, VersionRecord};
use crate::services::marketplace::{ErrorKind, Marketplace, ServiceError};

/// Versions are append-only; re-running with an unchanged version number is
/// expected to fail rather than be silently tolerated.
#[derive(thiserror::Error, Debug)]
pub enum ReleaseError {
    #[error("cannot update existing application version {version} of {name}")]
    VersionExists { name: String, version: String },
}

/// Submit the packaged template as a new immutable version. A conflict from
/// the service becomes [`ReleaseError::VersionExists`]; every other failure
/// is re-raised unchanged.
pub fn publish_version(
    marketplace: &dyn Marketplace,
    application: &ApplicationRecord,
    config: &PublishConfig,
    template_body: String,
) -> anyhow::Result<VersionRecord> {
    let request = CreateVersion {
        source_code_url: config.source_code_url.clone(),
        template_body,
    };
    match marketplace.create_application_version(
        &application.id,
        &config.semantic_version,
        &request,
    ) {
        Ok(version) => Ok(version),
        Err(err) => match err.downcast_ref::<ServiceError>() {
            Some(service) if service.kind == ErrorKind::Conflict => {
                Err(ReleaseError::VersionExists {
                    name: application.name.clone(),
                    version: config.semantic_version.clone(),
                }
                .into())
            }
            _ => Err(err),
        },
    }
}
