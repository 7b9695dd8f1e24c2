//! Remote text-generation providers.
//!
//! Each provider is described by a [`ProviderProfile`]: where to send the
//! request, how to authenticate, how to shape the JSON body, and where the
//! generated text lives in the response. Adding a provider means adding one
//! [`AiProvider`] variant and one profile.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ConfigError;

/// Upper bound on generated output, roughly a subject plus two sentences.
pub const MAX_OUTPUT_TOKENS: u32 = 100;

/// Sampling temperature sent to every provider.
pub const TEMPERATURE: f32 = 0.7;

/// Supported remote providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    /// Remote generation disabled; always use the rule-based classifier.
    #[default]
    None,
    OpenAi,
    Gemini,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::None => "none",
            AiProvider::OpenAi => "openai",
            AiProvider::Gemini => "gemini",
        }
    }

    /// Request/response description for this provider, `None` when disabled.
    pub fn profile(&self) -> Option<&'static ProviderProfile> {
        match self {
            AiProvider::None => None,
            AiProvider::OpenAi => Some(&OPENAI),
            AiProvider::Gemini => Some(&GEMINI),
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(AiProvider::None),
            "openai" => Ok(AiProvider::OpenAi),
            "gemini" => Ok(AiProvider::Gemini),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// How the credential is attached to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>` header.
    Bearer,
    /// Key passed as the named query parameter.
    QueryParam(&'static str),
}

/// Everything needed to talk to one provider.
#[derive(Debug)]
pub struct ProviderProfile {
    /// Human-readable name used in logs and warnings.
    pub name: &'static str,
    pub base_url: &'static str,
    pub path: &'static str,
    pub model: &'static str,
    pub auth: AuthStyle,
    pub build_body: fn(&ProviderProfile, &str) -> Value,
    /// Pull the first generated text out of a response, or describe why not.
    pub extract_text: fn(Value) -> Result<String, String>,
}

pub static OPENAI: ProviderProfile = ProviderProfile {
    name: "OpenAI",
    base_url: "https://api.openai.com",
    path: "/v1/chat/completions",
    model: "gpt-4o-mini",
    auth: AuthStyle::Bearer,
    build_body: chat_body,
    extract_text: chat_text,
};

pub static GEMINI: ProviderProfile = ProviderProfile {
    name: "Gemini",
    base_url: "https://generativelanguage.googleapis.com",
    path: "/v1beta/models/gemini-1.5-flash:generateContent",
    model: "gemini-1.5-flash",
    auth: AuthStyle::QueryParam("key"),
    build_body: gemini_body,
    extract_text: gemini_text,
};

// --- OpenAI chat completions ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn chat_body(profile: &ProviderProfile, prompt: &str) -> Value {
    json!({
        "model": profile.model,
        "messages": [{"role": "user", "content": prompt}],
        "max_tokens": MAX_OUTPUT_TOKENS,
        "temperature": TEMPERATURE,
    })
}

fn chat_text(value: Value) -> Result<String, String> {
    let response: ChatResponse = serde_json::from_value(value).map_err(|e| e.to_string())?;
    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| "response has no choices".to_string())?
        .message
        .content
        .ok_or_else(|| "first choice has no content".to_string())
}

// --- Gemini generateContent ---

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn gemini_body(_profile: &ProviderProfile, prompt: &str) -> Value {
    json!({
        "contents": [{"parts": [{"text": prompt}]}],
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
        },
    })
}

fn gemini_text(value: Value) -> Result<String, String> {
    let response: GenerateResponse =
        serde_json::from_value(value).map_err(|e| e.to_string())?;
    response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "response has no candidates".to_string())?
        .content
        .parts
        .into_iter()
        .next()
        .and_then(|p| p.text)
        .ok_or_else(|| "first candidate has no text part".to_string())
}
