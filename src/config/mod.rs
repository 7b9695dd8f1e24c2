//! Settings resolution: defaults, git config, environment, then CLI flags.

use std::env;
use std::fmt;
use std::time::Duration;

use git2::{Config, ErrorCode};
use tracing::warn;

use crate::error::ConfigError;
use crate::llm::AiProvider;

/// Message length limit used when the length check is enabled without a value.
pub const DEFAULT_MAX_LENGTH: usize = 72;

/// Default timeout for a remote generation round trip.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;

/// Environment variable to override the remote generation timeout (seconds).
pub const TIMEOUT_ENV_VAR: &str = "CMIT_AI_TIMEOUT";

/// Environment variable holding the provider credential.
pub const API_KEY_ENV_VAR: &str = "CMIT_API_KEY";

const KEY_USE_EMOJIS: &str = "cmit.useEmojis";
const KEY_MAX_LENGTH: &str = "cmit.maxLength";
const KEY_AI_PROVIDER: &str = "cmit.aiProvider";
const KEY_API_KEY: &str = "cmit.apiKey";

/// Provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential, treating blank strings as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Immutable per-request options consumed by synthesis and editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub use_emojis: bool,
    /// When set, the editor rejects messages longer than this many characters.
    pub max_message_length: Option<usize>,
    pub ai_provider: AiProvider,
    pub api_key: Option<ApiKey>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_emojis: true,
            max_message_length: None,
            ai_provider: AiProvider::None,
            api_key: None,
        }
    }
}

impl GenerationOptions {
    /// Whether a remote attempt should be made at all.
    pub fn remote_enabled(&self) -> bool {
        self.ai_provider != AiProvider::None && self.api_key.is_some()
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub use_emojis: Option<bool>,
    /// `Some(0)` disables the length limit.
    pub max_length: Option<usize>,
    pub ai_provider: Option<AiProvider>,
    pub api_key: Option<String>,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub use_emojis: bool,
    pub max_length: Option<usize>,
    pub ai_provider: AiProvider,
    pub api_key: Option<ApiKey>,
    pub ai_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_emojis: true,
            max_length: None,
            ai_provider: AiProvider::None,
            api_key: None,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Resolve settings from every layer in precedence order.
    pub fn resolve(config: &Config, overrides: SettingsOverrides) -> Result<Self, ConfigError> {
        Ok(Self::default()
            .with_git_config(config)?
            .with_env()
            .with_overrides(overrides))
    }

    /// Apply `cmit.*` keys from git configuration.
    pub fn with_git_config(mut self, config: &Config) -> Result<Self, ConfigError> {
        if let Some(value) = read_bool(config, KEY_USE_EMOJIS)? {
            self.use_emojis = value;
        }

        if let Some(value) = read_i64(config, KEY_MAX_LENGTH)? {
            self.max_length = match value {
                0 => None,
                n if n > 0 => Some(n as usize),
                n => {
                    return Err(ConfigError::InvalidValue {
                        key: KEY_MAX_LENGTH.to_string(),
                        value: n.to_string(),
                        reason: "must be a positive integer or 0".to_string(),
                    });
                }
            };
        }

        if let Some(value) = read_string(config, KEY_AI_PROVIDER)? {
            self.ai_provider = value.parse()?;
        }

        if let Some(value) = read_string(config, KEY_API_KEY)? {
            self.api_key = ApiKey::new(value);
        }

        Ok(self)
    }

    /// Apply `CMIT_API_KEY` and `CMIT_AI_TIMEOUT`.
    pub fn with_env(mut self) -> Self {
        if let Some(key) = env::var(API_KEY_ENV_VAR).ok().and_then(ApiKey::new) {
            self.api_key = Some(key);
        }
        self.ai_timeout = get_timeout();
        self
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(value) = overrides.use_emojis {
            self.use_emojis = value;
        }
        if let Some(value) = overrides.max_length {
            self.max_length = (value > 0).then_some(value);
        }
        if let Some(provider) = overrides.ai_provider {
            self.ai_provider = provider;
        }
        if let Some(key) = overrides.api_key.and_then(ApiKey::new) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            use_emojis: self.use_emojis,
            max_message_length: self.max_length,
            ai_provider: self.ai_provider,
            api_key: self.api_key.clone(),
        }
    }
}

/// Get the configured remote generation timeout.
///
/// Logs a warning if the environment variable is set but contains
/// an invalid value (non-numeric, empty, or zero).
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_AI_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
    }
}

fn not_found(e: &git2::Error) -> bool {
    e.code() == ErrorCode::NotFound
}

fn invalid(key: &str, e: git2::Error) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: String::new(),
        reason: e.message().to_string(),
    }
}

fn read_bool(config: &Config, key: &str) -> Result<Option<bool>, ConfigError> {
    match config.get_bool(key) {
        Ok(v) => Ok(Some(v)),
        Err(e) if not_found(&e) => Ok(None),
        Err(e) => Err(invalid(key, e)),
    }
}

fn read_i64(config: &Config, key: &str) -> Result<Option<i64>, ConfigError> {
    match config.get_i64(key) {
        Ok(v) => Ok(Some(v)),
        Err(e) if not_found(&e) => Ok(None),
        Err(e) => Err(invalid(key, e)),
    }
}

fn read_string(config: &Config, key: &str) -> Result<Option<String>, ConfigError> {
    match config.get_string(key) {
        Ok(v) => Ok(Some(v)),
        Err(e) if not_found(&e) => Ok(None),
        Err(e) => Err(invalid(key, e)),
    }
}
