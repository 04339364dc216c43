pub mod calendar;
pub mod coach;
pub mod config;
pub mod goal;
pub mod init;
pub mod status;
pub mod tactic;
pub mod ui;
pub mod vision;
pub mod wam;
pub mod week;

use anyhow::Context;
use catalyst_coach::CoachingProvider;
use catalyst_core::config::Config;
use catalyst_core::cycle::Cycle;
use catalyst_core::repository::{self, CycleRepository};
use chrono::Utc;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// One CLI invocation's view of the stored cycle.
///
/// Edits are applied to a working copy and written straight back; a
/// one-shot command has nothing to debounce.
pub struct Session {
    pub config: Config,
    repo: Box<dyn CycleRepository>,
    cycle: Cycle,
}

impl Session {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let config = Config::load(root).context("failed to load config")?;
        let repo = repository::open(root, &config.storage)?;
        let (cycle, created) = repository::load_or_init(repo.as_ref(), config.storage.user_key())
            .with_context(|| format!("failed to load cycle from {}", repo.describe()))?;
        if created {
            eprintln!("Started a new 12-week cycle.");
        }
        Ok(Self {
            config,
            repo,
            cycle,
        })
    }

    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    /// Apply `edit` and persist the result if anything changed. A failed
    /// edit leaves the stored cycle untouched.
    pub fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut Cycle) -> catalyst_core::Result<T>,
    ) -> anyhow::Result<T> {
        let mut draft = self.cycle.clone();
        let out = edit(&mut draft)?;
        if draft != self.cycle {
            draft.refresh_streak(Utc::now());
            self.repo
                .save(self.config.storage.user_key(), &draft)
                .with_context(|| format!("failed to save cycle to {}", self.repo.describe()))?;
            self.cycle = draft;
        }
        Ok(out)
    }

    pub fn coach(&self) -> anyhow::Result<Arc<dyn CoachingProvider>> {
        Ok(catalyst_coach::from_config(&self.config.coach)?)
    }
}

/// Drive one async coaching call from synchronous command code.
pub fn block_on<F: Future>(fut: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(fut))
}

/// Resolve a goal by id, id prefix, or 1-based position.
pub fn resolve_goal_id(cycle: &Cycle, key: &str) -> anyhow::Result<String> {
    if let Ok(pos) = key.parse::<usize>() {
        if let Some(goal) = pos.checked_sub(1).and_then(|i| cycle.goals.get(i)) {
            return Ok(goal.id.clone());
        }
    }
    let ids: Vec<&str> = cycle.goals.iter().map(|g| g.id.as_str()).collect();
    resolve_prefix(&ids, key)
        .ok_or_else(|| catalyst_core::CatalystError::GoalNotFound(key.to_string()).into())
}

/// Resolve a tactic by id or id prefix across every goal.
pub fn resolve_tactic_id(cycle: &Cycle, key: &str) -> anyhow::Result<String> {
    let ids: Vec<&str> = cycle.tactics().map(|t| t.id.as_str()).collect();
    resolve_prefix(&ids, key)
        .ok_or_else(|| catalyst_core::CatalystError::TacticNotFound(key.to_string()).into())
}

/// Shorter keys are positions, never prefixes.
const MIN_PREFIX_LEN: usize = 4;

/// Exact match first, then a unique prefix.
fn resolve_prefix(ids: &[&str], key: &str) -> Option<String> {
    if let Some(id) = ids.iter().find(|id| **id == key) {
        return Some(id.to_string());
    }
    if key.len() < MIN_PREFIX_LEN {
        return None;
    }
    let mut matches = ids.iter().filter(|id| id.starts_with(key));
    let first = matches.next()?;
    match matches.next() {
        None => Some(first.to_string()),
        Some(_) => None,
    }
}

/// First eight characters of an id, enough to type back as a prefix.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
