use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::models::{
    ApplicationPage, ApplicationRecord, CreateApplication, CreateVersion, PolicyStatement,
    UpdateApplication, VersionRecord,
};
use crate::services::config::load_profile;

/// Closed taxonomy of remote failures. Classification happens once, at this
/// client boundary; everything downstream switches on the kind, never on raw
/// error-code strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Conflict,
    NotFound,
    Forbidden,
    Throttled,
    Internal,
    Other,
}

impl ErrorKind {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "bad_request" => Some(Self::BadRequest),
            "conflict" => Some(Self::Conflict),
            "not_found" => Some(Self::NotFound),
            "forbidden" => Some(Self::Forbidden),
            "throttled" => Some(Self::Throttled),
            "internal" => Some(Self::Internal),
            _ => None,
        }
    }

    fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            401 | 403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::Throttled,
            500..=599 => Self::Internal,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::Throttled => "THROTTLED",
            Self::Internal => "INTERNAL",
            Self::Other => "SERVICE_ERROR",
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{code}: {message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ServiceError {
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or(ErrorBody {
            code: None,
            message: None,
        });
        let code = parsed.code.unwrap_or_else(|| status.as_u16().to_string());
        let kind = ErrorKind::from_code(&code).unwrap_or_else(|| ErrorKind::from_status(status));
        let message = parsed
            .message
            .unwrap_or_else(|| format!("service returned {status}"));
        Self {
            kind,
            code,
            message,
        }
    }
}

/// One method per remote operation. The pipeline only ever talks to this
/// trait, which keeps the reconcile/publish/visibility logic testable
/// against an in-memory fake.
pub trait Marketplace {
    fn list_applications(&self, next_token: Option<&str>) -> anyhow::Result<ApplicationPage>;
    fn get_application(&self, id: &str) -> anyhow::Result<ApplicationRecord>;
    fn create_application(&self, req: &CreateApplication) -> anyhow::Result<ApplicationRecord>;
    fn update_application(
        &self,
        id: &str,
        req: &UpdateApplication,
    ) -> anyhow::Result<ApplicationRecord>;
    fn create_application_version(
        &self,
        id: &str,
        semantic_version: &str,
        req: &CreateVersion,
    ) -> anyhow::Result<VersionRecord>;
    fn put_application_policy(
        &self,
        id: &str,
        statements: &[PolicyStatement],
    ) -> anyhow::Result<()>;
    fn fetch_license(&self, url: &str) -> anyhow::Result<String>;
}

/// Blocking REST client over the profile's endpoint.
pub struct HttpMarketplace {
    base: String,
    token: String,
    http: reqwest::blocking::Client,
}

impl HttpMarketplace {
    pub fn connect(profile_name: &str, region: &str) -> anyhow::Result<Self> {
        let profile = load_profile(profile_name)?;
        let base = profile
            .endpoint
            .replace("{region}", region)
            .trim_end_matches('/')
            .to_string();
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base,
            token: profile.token,
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> anyhow::Result<T> {
        let resp = req.bearer_auth(&self.token).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ServiceError::from_response(status, &body).into());
        }
        Ok(resp.json()?)
    }

    fn send_unit(&self, req: reqwest::blocking::RequestBuilder) -> anyhow::Result<()> {
        let resp = req.bearer_auth(&self.token).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ServiceError::from_response(status, &body).into());
        }
        Ok(())
    }
}

impl Marketplace for HttpMarketplace {
    fn list_applications(&self, next_token: Option<&str>) -> anyhow::Result<ApplicationPage> {
        let mut req = self.http.get(self.url("/applications"));
        if let Some(token) = next_token {
            req = req.query(&[("next_token", token)]);
        }
        self.send(req)
    }

    fn get_application(&self, id: &str) -> anyhow::Result<ApplicationRecord> {
        self.send(self.http.get(self.url(&format!("/applications/{id}"))))
    }

    fn create_application(&self, req: &CreateApplication) -> anyhow::Result<ApplicationRecord> {
        self.send(self.http.post(self.url("/applications")).json(req))
    }

    fn update_application(
        &self,
        id: &str,
        req: &UpdateApplication,
    ) -> anyhow::Result<ApplicationRecord> {
        self.send(
            self.http
                .patch(self.url(&format!("/applications/{id}")))
                .json(req),
        )
    }

    fn create_application_version(
        &self,
        id: &str,
        semantic_version: &str,
        req: &CreateVersion,
    ) -> anyhow::Result<VersionRecord> {
        self.send(
            self.http
                .put(self.url(&format!("/applications/{id}/versions/{semantic_version}")))
                .json(req),
        )
    }

    fn put_application_policy(
        &self,
        id: &str,
        statements: &[PolicyStatement],
    ) -> anyhow::Result<()> {
        self.send_unit(
            self.http
                .put(self.url(&format!("/applications/{id}/policy")))
                .json(&serde_json::json!({ "statements": statements })),
        )
    }

    /// License URLs come back from the service presigned; no bearer token.
    fn fetch_license(&self, url: &str) -> anyhow::Result<String> {
        let resp = self.http.get(url).send()?.error_for_status()?;
        Ok(resp.text()?)
    }
}

/// Paginated scan for an exact name match. List rows are summaries, so a hit
/// costs exactly one extra detail call; a miss walks every page before
/// returning `None`.
pub fn find_application(
    marketplace: &dyn Marketplace,
    name: &str,
) -> anyhow::Result<Option<ApplicationRecord>> {
    let mut next_token: Option<String> = None;
    loop {
        let page = marketplace.list_applications(next_token.as_deref())?;
        if let Some(hit) = page.applications.iter().find(|a| a.name == name) {
            return Ok(Some(marketplace.get_application(&hit.id)?));
        }
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => return Ok(None),
        }
    }
}
