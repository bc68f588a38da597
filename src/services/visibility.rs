use std::time::Duration;

use crate::domain::constants::{
    ANY_PRINCIPAL, DEPLOY_ACTION, PUBLIC_STATEMENT_ID, READINESS_ATTEMPTS,
    READINESS_BASE_DELAY_MS,
};
use crate::domain::models::PolicyStatement;
use crate::services::marketplace::{ErrorKind, Marketplace, ServiceError};

#[derive(Debug, PartialEq, Eq)]
pub enum PolicyOutcome {
    Granted,
    /// The service rejected the grant inside its propagation window; the run
    /// still succeeds and the operator is told to re-run.
    Deferred(String),
}

pub fn public_deploy_statement() -> PolicyStatement {
    PolicyStatement {
        statement_id: PUBLIC_STATEMENT_ID.to_string(),
        actions: vec![DEPLOY_ACTION.to_string()],
        principals: vec![ANY_PRINCIPAL.to_string()],
    }
}

/// Wait for the just-published version to appear on the application record,
/// then grant public deploy access.
///
/// The wait is a bounded poll with doubling delays, not a fixed sleep: the
/// repository's index is eventually consistent and the grant depends on the
/// version being visible. Throttling during the poll counts as "not ready
/// yet"; any other poll failure propagates. The grant itself is a single
/// attempt: a bad-request rejection there is tolerated as
/// [`PolicyOutcome::Deferred`], anything else propagates.
pub fn grant_public_deploy(
    marketplace: &dyn Marketplace,
    application_id: &str,
    semantic_version: &str,
    mut sleep: impl FnMut(Duration),
) -> anyhow::Result<PolicyOutcome> {
    let mut delay = Duration::from_millis(READINESS_BASE_DELAY_MS);
    for attempt in 1..=READINESS_ATTEMPTS {
        match marketplace.get_application(application_id) {
            Ok(record) if record.latest_version.as_deref() == Some(semantic_version) => break,
            Ok(_) => {}
            Err(err) => match err.downcast_ref::<ServiceError>() {
                Some(service) if service.kind == ErrorKind::Throttled => {}
                _ => return Err(err),
            },
        }
        if attempt < READINESS_ATTEMPTS {
            sleep(delay);
            delay *= 2;
        }
    }

    let statements = [public_deploy_statement()];
    match marketplace.put_application_policy(application_id, &statements) {
        Ok(()) => Ok(PolicyOutcome::Granted),
        Err(err) => match err.downcast_ref::<ServiceError>() {
            Some(service) if service.kind == ErrorKind::BadRequest => {
                Ok(PolicyOutcome::Deferred(format!(
                    "public deploy grant not accepted yet: {}",
                    service.message
                )))
            }
            _ => Err(err),
        },
    }
}
