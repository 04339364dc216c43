//! Best-effort decoding of structured model output.
//!
//! Models wrap JSON in prose or markdown fences. [`extract_json`] pulls out
//! the most likely payload; the `decode_*` functions never fail and report
//! whether they had to fall back to static content.

use catalyst_core::cycle::TacticDraft;
use catalyst_core::types::Frequency;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Number of vision prompts a caller receives.
pub const VISION_PROMPT_COUNT: usize = 5;

pub const FALLBACK_VISION_PROMPTS: [&str; VISION_PROMPT_COUNT] = [
    "What would make this the most transformative 12 weeks of your life?",
    "What fear are you finally ready to overcome?",
    "If failure were impossible, what would you pursue?",
    "What daily habit would fundamentally change your trajectory?",
    "What will you regret NOT starting in the next 12 weeks?",
];

const DEFAULT_TACTIC_DESCRIPTION: &str = "New Tactic";

// ---------------------------------------------------------------------------
// Decoded
// ---------------------------------------------------------------------------

/// A decoded value, or the fallback used in its place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Decoded<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> Decoded<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Decoded::Parsed(v) | Decoded::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Decoded::Parsed(v) | Decoded::Fallback(v) => v,
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

static FENCED_RE: OnceLock<Regex> = OnceLock::new();
static ARRAY_RE: OnceLock<Regex> = OnceLock::new();
static OBJECT_RE: OnceLock<Regex> = OnceLock::new();

fn fenced_re() -> &'static Regex {
    FENCED_RE.get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").unwrap())
}

fn array_re() -> &'static Regex {
    ARRAY_RE.get_or_init(|| Regex::new(r"\[[\s\S]*\]").unwrap())
}

fn object_re() -> &'static Regex {
    OBJECT_RE.get_or_init(|| Regex::new(r"\{[\s\S]*\}").unwrap())
}

/// Most likely JSON payload in `text`: a fenced block, else the widest
/// `[...]`, else the widest `{...}`, else the trimmed text.
pub fn extract_json(text: &str) -> &str {
    if let Some(inner) = fenced_re().captures(text).and_then(|c| c.get(1)) {
        return inner.as_str().trim();
    }
    if let Some(m) = array_re().find(text) {
        return m.as_str();
    }
    if let Some(m) = object_re().find(text) {
        return m.as_str();
    }
    text.trim()
}

// ---------------------------------------------------------------------------
// Vision prompts
// ---------------------------------------------------------------------------

pub fn fallback_vision_prompts() -> Vec<String> {
    FALLBACK_VISION_PROMPTS.iter().map(|s| s.to_string()).collect()
}

/// At least five non-empty strings, truncated to five. Anything else falls
/// back to the static list.
pub fn decode_vision_prompts(text: &str) -> Decoded<Vec<String>> {
    let parsed: Option<Vec<String>> = serde_json::from_str(extract_json(text)).ok();
    match parsed {
        Some(prompts) => {
            let prompts: Vec<String> = prompts
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if prompts.len() < VISION_PROMPT_COUNT {
                tracing::warn!(got = prompts.len(), "too few vision prompts, using fallback");
                return Decoded::Fallback(fallback_vision_prompts());
            }
            Decoded::Parsed(prompts.into_iter().take(VISION_PROMPT_COUNT).collect())
        }
        None => {
            tracing::warn!("failed to parse vision prompts, using fallback");
            Decoded::Fallback(fallback_vision_prompts())
        }
    }
}

// ---------------------------------------------------------------------------
// Tactic suggestions
// ---------------------------------------------------------------------------

/// Array of `{description, frequency, target}`; each item normalized.
/// Unparseable output yields an empty fallback.
pub fn decode_tactics(text: &str) -> Decoded<Vec<TacticDraft>> {
    match serde_json::from_str::<Vec<Value>>(extract_json(text)) {
        Ok(items) => Decoded::Parsed(items.iter().map(normalize_tactic).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse suggested tactics");
            Decoded::Fallback(Vec::new())
        }
    }
}

fn normalize_tactic(item: &Value) -> TacticDraft {
    let description = item
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TACTIC_DESCRIPTION)
        .to_string();
    let frequency = item
        .get("frequency")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Frequency>().ok())
        .unwrap_or(Frequency::Weekly);
    let target = item
        .get("target")
        .and_then(|v| v.as_f64().or_else(|| v.as_str()?.trim().parse().ok()))
        .map(f64::round)
        .filter(|t| *t >= 1.0)
        .map(|t| t.min(f64::from(u32::MAX)) as u32)
        .unwrap_or(1);
    TacticDraft::new(description, frequency, target)
}
