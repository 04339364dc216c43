//! Canned provider for tests and offline runs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::error::CoachError;
use crate::provider::CoachingProvider;
use crate::Result;

/// Answers every prompt with the same text, or fails every request.
pub struct MockProvider {
    response: Option<String>,
    call_count: AtomicU32,
    last_prompt: Mutex<Option<String>>,
}

impl MockProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Every request fails with an upstream HTTP error.
    pub fn failing() -> Self {
        Self {
            response: None,
            call_count: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl CoachingProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap_or_else(|e| e.into_inner()) = Some(prompt.to_string());
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(CoachError::Status {
                status: 503,
                body: "mock provider is failing".to_string(),
            }),
        }
    }
}
