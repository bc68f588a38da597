//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `publish.rs` — the full package/reconcile/publish pipeline.
//! - `inspect.rs` — partial entry points (`package`, `show`).
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod inspect;
pub mod publish;

pub use inspect::{handle_package, handle_show};
pub use publish::handle_publish;
