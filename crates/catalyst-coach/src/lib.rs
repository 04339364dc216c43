//! `catalyst-coach` — hosted-model coaching for 12-week cycles.
//!
//! One [`CoachingProvider`] trait, implemented per backend. Backends only
//! know how to send a prompt and return text; the coaching operations
//! (plan critique, recovery plan, vision prompts, vision refinement, tactic
//! suggestions) are trait methods built on that.
//!
//! ```text
//! CoachConfig ──▶ from_config ──▶ Arc<dyn CoachingProvider>
//!                                   ├── OpenRouterProvider  (chat/completions)
//!                                   ├── GeminiProvider      (generateContent)
//!                                   └── MockProvider        (tests)
//! ```
//!
//! Structured output goes through [`decode`], which never fails: malformed
//! model output yields a [`Decoded::Fallback`].

pub mod decode;
pub mod error;
pub mod gemini;
pub(crate) mod http;
pub mod mock;
pub mod openrouter;
pub mod prompts;
pub mod provider;

use catalyst_core::config::{CoachBackend, CoachConfig};
use std::sync::Arc;

pub use decode::Decoded;
pub use error::CoachError;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openrouter::OpenRouterProvider;
pub use provider::CoachingProvider;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, CoachError>;

/// Build the provider selected by config. API keys are read from the
/// environment now; a missing key only fails when a request is made.
pub fn from_config(config: &CoachConfig) -> Result<Arc<dyn CoachingProvider>> {
    let backend = &config.backend;
    let api_key = std::env::var(backend.api_key_env())
        .ok()
        .filter(|k| !k.is_empty());
    if api_key.is_none() {
        tracing::debug!(env = backend.api_key_env(), "coaching API key not set");
    }

    let provider: Arc<dyn CoachingProvider> = match backend {
        CoachBackend::OpenRouter {
            model,
            base_url,
            api_key_env,
        } => Arc::new(OpenRouterProvider::new(
            base_url,
            model,
            api_key,
            api_key_env,
            config.temperature,
            config.timeout_secs,
        )?),
        CoachBackend::Gemini {
            model,
            base_url,
            api_key_env,
        } => Arc::new(GeminiProvider::new(
            base_url,
            model,
            api_key,
            api_key_env,
            config.temperature,
            config.timeout_secs,
        )?),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_configured_backend() {
        let mut config = CoachConfig::default();
        assert_eq!(from_config(&config).unwrap().name(), "open_router");
        config.backend = CoachBackend::gemini();
        assert_eq!(from_config(&config).unwrap().name(), "gemini");
    }
}
