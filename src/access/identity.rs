//! Identity providers: who does this bearer token belong to?

use super::AccessError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the provider does not recognise the token.
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, AccessError>;
}

/// Fixed token table, loaded from a JSON object of `token -> {id, email}`.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    pub fn new(tokens: HashMap<String, Identity>) -> Self {
        Self { tokens }
    }

    pub fn from_file(path: &Path) -> Result<Self, AccessError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AccessError::ProviderUnavailable(format!("{}: {e}", path.display())))?;
        let tokens = serde_json::from_str(&raw)
            .map_err(|e| AccessError::ProviderUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self { tokens })
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, AccessError> {
        Ok(self.tokens.get(token).cloned())
    }
}

/// Hosted auth service exposing a "current user" endpoint.
///
/// Sends `Authorization: Bearer <token>` (plus an `apikey` header when configured) and
/// expects `{id, email}` back. 401 and 403 mean the token is not valid.
pub struct RemoteIdentityProvider {
    http: reqwest::Client,
    user_url: String,
    api_key: Option<String>,
}

impl RemoteIdentityProvider {
    pub fn new(
        user_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AccessError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AccessError::ProviderUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            user_url: user_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    #[instrument(skip_all)]
    async fn current_identity(&self, token: &str) -> Result<Option<Identity>, AccessError> {
        let mut request = self.http.get(&self.user_url).bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AccessError::ProviderTimeout
            } else {
                AccessError::ProviderUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            debug!(status = status.as_u16(), "Token rejected");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "Identity provider error");
            return Err(AccessError::ProviderUnavailable(format!(
                "identity provider answered {status}"
            )));
        }

        let identity = response
            .json::<Identity>()
            .await
            .map_err(|e| AccessError::ProviderUnavailable(e.to_string()))?;
        Ok(Some(identity))
    }
}
