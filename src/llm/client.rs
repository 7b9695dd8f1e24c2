//! HTTP adapter for remote commit-message generation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::ApiKey;
use crate::error::AiError;
use crate::llm::prompt::build_commit_prompt;
use crate::llm::provider::{AiProvider, AuthStyle};

/// Maximum characters of an error body kept in [`AiError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Inputs for one generation attempt.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub provider: AiProvider,
    pub api_key: Option<&'a ApiKey>,
    pub diff: &'a str,
    pub diff_truncated: bool,
    /// One-line summaries of the staged files.
    pub files: &'a [String],
}

/// A remote text generator.
///
/// One request/response round trip per call; no retries.
#[async_trait]
pub trait RemoteGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AiError>;
}

/// [`RemoteGenerator`] over HTTPS using reqwest.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    timeout: Duration,
    base_url: Option<String>,
}

impl HttpGenerator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            base_url: None,
        }
    }

    /// Send requests to `base_url` instead of the provider's public endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[async_trait]
impl RemoteGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AiError> {
        let profile = request.provider.profile().ok_or(AiError::ProviderDisabled)?;
        let provider = profile.name;
        let key = request.api_key.ok_or(AiError::MissingCredential(provider))?;

        if request.diff.trim().is_empty() {
            return Err(AiError::EmptyDiff);
        }

        let prompt = build_commit_prompt(request.files, request.diff, request.diff_truncated);
        let base = self.base_url.as_deref().unwrap_or(profile.base_url);
        let url = format!("{}{}", base.trim_end_matches('/'), profile.path);

        debug!("Requesting commit message from {} ({} chars)", provider, prompt.len());

        let mut builder = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&(profile.build_body)(profile, &prompt));

        builder = match profile.auth {
            AuthStyle::Bearer => builder.bearer_auth(key.expose()),
            AuthStyle::QueryParam(name) => builder.query(&[(name, key.expose())]),
        };

        // The request URL can carry the credential, so it never reaches messages.
        let transport = |source: reqwest::Error| {
            let source = source.without_url();
            if source.is_timeout() {
                AiError::Timeout {
                    provider,
                    secs: self.timeout.as_secs(),
                }
            } else {
                AiError::Transport { provider, source }
            }
        };

        let response = builder.send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                provider,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let value: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| AiError::MalformedResponse {
                    provider,
                    reason: e.without_url().to_string(),
                })?;

        let raw = (profile.extract_text)(value)
            .map_err(|reason| AiError::MalformedResponse { provider, reason })?;

        let text = clean_completion(&raw);
        if text.is_empty() {
            return Err(AiError::EmptyCompletion(provider));
        }
        Ok(text)
    }
}

/// Strip wrapping code fences and quotes that models sometimes add.
pub fn clean_completion(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag on the opening fence line
        let rest = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
        text = rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    for quote in ['"', '\'', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = text[1..text.len() - 1].trim();
        }
    }

    text.to_string()
}
