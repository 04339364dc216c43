use async_trait::async_trait;
use catalyst_core::cycle::{Cycle, Goal, TacticDraft};

use crate::decode::{self, Decoded};
use crate::error::CoachError;
use crate::prompts;
use crate::Result;

/// A hosted model that can answer coaching prompts.
///
/// Backends implement [`complete`](CoachingProvider::complete) (and
/// optionally [`complete_json`](CoachingProvider::complete_json)); the five
/// coaching operations are built on top of them. Structured operations never
/// fail: transport or decode errors yield their documented fallback.
#[async_trait]
pub trait CoachingProvider: Send + Sync {
    /// Backend name for logs and `config show`.
    fn name(&self) -> &str;

    /// Send one user prompt and return the model's text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Like `complete`, for prompts that ask for JSON. Backends with a native
    /// JSON response mode override this.
    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }

    /// Critique of the plan plus three "Power Actions".
    async fn get_feedback(&self, vision: &str, goals: &[Goal]) -> Result<String> {
        self.complete(&prompts::feedback(vision, goals)).await
    }

    /// Corrective recovery plan for a 1-based week of `cycle`.
    async fn get_corrective_action(&self, cycle: &Cycle, week_number: u32) -> Result<String> {
        let week = cycle
            .week(week_number)
            .map_err(|_| CoachError::WeekOutOfRange(week_number))?;
        self.complete(&prompts::corrective_action(week.score, week_number, &cycle.goals))
            .await
    }

    /// Five questions that help define a vision.
    async fn generate_vision_prompts(&self) -> Decoded<Vec<String>> {
        match self.complete_json(&prompts::vision_prompts()).await {
            Ok(text) => decode::decode_vision_prompts(&text),
            Err(e) => {
                tracing::warn!(provider = self.name(), error = %e, "vision prompts request failed, using fallback");
                Decoded::Fallback(decode::fallback_vision_prompts())
            }
        }
    }

    async fn refine_vision(&self, draft: &str) -> Result<String> {
        self.complete(&prompts::refine_vision(draft)).await
    }

    /// Three to five repeatable tactics for a goal; empty on failure.
    async fn suggest_tactics(&self, goal_title: &str) -> Decoded<Vec<TacticDraft>> {
        match self.complete_json(&prompts::suggest_tactics(goal_title)).await {
            Ok(text) => decode::decode_tactics(&text),
            Err(e) => {
                tracing::warn!(provider = self.name(), error = %e, "tactic suggestion request failed");
                Decoded::Fallback(Vec::new())
            }
        }
    }
}
