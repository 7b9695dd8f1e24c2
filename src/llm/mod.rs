//! Remote text generation: providers, prompt construction and the HTTP adapter.

pub mod client;
pub mod prompt;
pub mod provider;

pub use client::{GenerationRequest, HttpGenerator, RemoteGenerator, clean_completion};
pub use prompt::{COMMIT_TYPES, build_commit_prompt};
pub use provider::{AiProvider, AuthStyle, ProviderProfile};
