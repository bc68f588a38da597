//! Stable constants shared across commands and services.

/// Publish configuration, read from the working directory unless overridden.
pub const CONFIG_FILE: &str = "sarp.yaml";

/// Local assets consumed by the publish pipeline.
pub const README_FILE: &str = "README.md";
pub const LICENSE_FILE: &str = "LICENSE";
pub const TEMPLATE_FILE: &str = "template.yaml";

/// Where `sarp package` leaves its output.
pub const PACKAGED_TEMPLATE_FILE: &str = "packaged.yaml";

/// Directory the dependency installer runs in.
pub const FUNCTIONS_DIR: &str = "src/functions";

/// External toolchain commands.
pub const INSTALL_COMMAND: &str = "npm";
pub const PACKAGE_COMMAND: &str = "stackkit";

/// Credential profile store, relative to `$HOME`.
pub const PROFILES_FILE: &str = ".config/sarp/profiles.toml";

/// Public-deploy policy statement.
pub const PUBLIC_STATEMENT_ID: &str = "public-access";
pub const DEPLOY_ACTION: &str = "deploy";
pub const ANY_PRINCIPAL: &str = "*";

/// Readiness poll before granting public access: capped attempts with
/// doubling delays (1s, 2s, 4s, 8s between the five calls).
pub const READINESS_ATTEMPTS: u32 = 5;
pub const READINESS_BASE_DELAY_MS: u64 = 1_000;
