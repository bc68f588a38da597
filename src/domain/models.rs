use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Declarative publish configuration (`sarp.yaml`).
///
/// Every field is required; a missing or mistyped key fails at parse time
/// with a field-level error instead of surfacing later in the pipeline.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    pub profile: String,
    pub region: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub home_page_url: String,
    pub labels: Vec<String>,
    pub spdx_license_id: String,
    pub semantic_version: String,
    pub source_code_url: String,
    pub bucket: String,
    pub public: bool,
}

/// Credential profile store (`~/.config/sarp/profiles.toml`).
#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Profile {
    pub token: String,
    /// Base URL of the repository service. A literal `{region}` placeholder
    /// is substituted with the configured region.
    pub endpoint: String,
}

/// Local documents consumed by the publish pipeline.
#[derive(Debug)]
pub struct Assets {
    pub readme: String,
    pub license: String,
}

/// Summary row from a list page. Detail fields live on [`ApplicationRecord`].
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApplicationSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApplicationPage {
    pub applications: Vec<ApplicationSummary>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Full remote application record, owned by the repository service.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApplicationRecord {
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    #[serde(default)]
    pub home_page_url: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub spdx_license_id: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub latest_version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateApplication {
    pub name: String,
    pub author: String,
    pub description: String,
    pub home_page_url: String,
    pub labels: Vec<String>,
    pub readme_body: String,
    pub spdx_license_id: String,
    pub license_body: String,
}

/// Update payload. License and name are immutable server-side; keeping them
/// out of this struct keeps them out of every update call.
#[derive(Debug, Serialize)]
pub struct UpdateApplication {
    pub author: String,
    pub description: String,
    pub home_page_url: String,
    pub labels: Vec<String>,
    pub readme_body: String,
}

#[derive(Debug, Serialize)]
pub struct CreateVersion {
    pub source_code_url: String,
    pub template_body: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VersionRecord {
    pub application_id: String,
    pub semantic_version: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct PolicyStatement {
    pub statement_id: String,
    pub actions: Vec<String>,
    pub principals: Vec<String>,
}

#[derive(Serialize)]
pub struct PublishReport {
    pub application_id: String,
    pub name: String,
    pub semantic_version: String,
    /// "created" or "updated".
    pub action: String,
    /// "private", "public", or "pending" when the grant was deferred.
    pub visibility: String,
}

#[derive(Serialize)]
pub struct PackageReport {
    pub path: String,
    pub bytes: usize,
}
