//! Organization registry lookup (DaData `findById/party`).
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::LookupConfig;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("registry credentials are not configured")]
    MissingCredentials,

    #[error("invalid registry endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("no organization with OGRN {0}")]
    NotFound(String),

    #[error("registry request failed: {0}")]
    Transport(String),

    #[error("registry answered {0}")]
    Status(String),

    #[error("registry response could not be decoded: {0}")]
    Decode(String),
}

/// Normalized organization card returned to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    pub name: String,
    pub short_name: String,
    pub legal_address: String,
    pub boss_role: String,
    pub boss_name_patronymic: String,
    pub boss_last_name: String,
}

#[async_trait]
pub trait OrganizationLookup: Send + Sync {
    async fn find_by_ogrn(&self, ogrn: &str) -> Result<OrganizationInfo, LookupError>;
}

/// HTTP client for the registry. Credentials are checked per call so a
/// missing key only fails lookups, not startup.
pub struct DadataClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    secret: String,
}

impl DadataClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|url| url.join("findById/party"))
            .map_err(|e| LookupError::InvalidEndpoint(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
            secret: config.secret.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl OrganizationLookup for DadataClient {
    async fn find_by_ogrn(&self, ogrn: &str) -> Result<OrganizationInfo, LookupError> {
        if self.api_key.is_empty() || self.secret.is_empty() {
            return Err(LookupError::MissingCredentials);
        }

        debug!("Looking up OGRN {} at {}", ogrn, self.endpoint);
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .header("Authorization", format!("Token {}", self.api_key))
            .header("X-Secret", &self.secret)
            .json(&json!({ "query": ogrn }))
            .send()
            .await
            .map_err(|e| {
                warn!("Registry request for {} failed: {}", ogrn, e);
                LookupError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Registry answered {} for {}", status, ogrn);
            return Err(LookupError::Status(status.to_string()));
        }

        let party: PartyResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        normalize_party(party, ogrn)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PartyResponse {
    #[serde(default)]
    suggestions: Vec<PartySuggestion>,
}

#[derive(Debug, Default, Deserialize)]
struct PartySuggestion {
    #[serde(default)]
    data: PartyData,
}

#[derive(Debug, Default, Deserialize)]
struct PartyData {
    #[serde(default)]
    name: Option<PartyName>,
    #[serde(default)]
    address: Option<PartyAddress>,
    #[serde(default)]
    management: Option<PartyManagement>,
}

#[derive(Debug, Default, Deserialize)]
struct PartyName {
    #[serde(default)]
    full_with_opf: Option<String>,
    #[serde(default)]
    short_with_opf: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PartyAddress {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PartyManagement {
    #[serde(default)]
    post: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Takes the first suggestion; none at all means the OGRN is unknown.
pub fn normalize_party(party: PartyResponse, ogrn: &str) -> Result<OrganizationInfo, LookupError> {
    let data = party
        .suggestions
        .into_iter()
        .next()
        .map(|s| s.data)
        .ok_or_else(|| LookupError::NotFound(ogrn.to_string()))?;

    let name = data.name.unwrap_or_default();
    let mut info = OrganizationInfo {
        name: name.full_with_opf.unwrap_or_default(),
        short_name: name.short_with_opf.unwrap_or_default(),
        legal_address: data.address.and_then(|a| a.value).unwrap_or_default(),
        ..Default::default()
    };

    if let Some(management) = data.management {
        info.boss_role = management.post.unwrap_or_default();
        let (last_name, rest) = split_manager_name(management.name.as_deref().unwrap_or(""));
        info.boss_last_name = last_name;
        info.boss_name_patronymic = rest;
    }

    Ok(info)
}

/// First word is the last name; the remaining words are name and patronymic.
pub fn split_manager_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    match parts.next() {
        None => (String::new(), String::new()),
        Some(last_name) => (last_name.to_string(), parts.collect::<Vec<_>>().join(" ")),
    }
}

/// Exactly 13 ASCII digits
pub fn is_valid_ogrn(value: &str) -> bool {
    value.len() == 13 && value.bytes().all(|b| b.is_ascii_digit())
}
