//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `config.rs` — publish config, local assets, credential profiles.
//! - `packager.rs` — dependency install + external template packaging.
//! - `marketplace.rs` — repository API client, error taxonomy, resolver.
//! - `reconcile.rs` — license verification and create/update payloads.
//! - `release.rs` — immutable version submission.
//! - `visibility.rs` — readiness poll + public deploy grant.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.
//! - Classify remote failures once, in `marketplace.rs`; match on
//!   `ErrorKind` everywhere else.

pub mod config;
pub mod marketplace;
pub mod output;
pub mod packager;
pub mod reconcile;
pub mod release;
pub mod visibility;
