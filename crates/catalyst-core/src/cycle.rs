use crate::error::{CatalystError, Result};
use crate::score;
use crate::types::Frequency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const WEEKS_PER_CYCLE: u32 = 12;
pub const DAYS_PER_CYCLE: i64 = 84;
pub const MAX_GOALS: usize = 3;

// ---------------------------------------------------------------------------
// Tactic
// ---------------------------------------------------------------------------

/// A repeatable lead-indicator action owned by a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tactic {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub frequency: Frequency,
    /// Repetitions per week that count as fully satisfied. Always >= 1.
    #[serde(default = "default_target")]
    pub target: u32,
}

fn default_target() -> u32 {
    1
}

/// A tactic that has not been placed in a goal yet (user input or coaching
/// suggestion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticDraft {
    pub description: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_target")]
    pub target: u32,
}

impl TacticDraft {
    pub fn new(description: impl Into<String>, frequency: Frequency, target: u32) -> Self {
        Self {
            description: description.into(),
            frequency,
            target,
        }
    }

    fn into_tactic(self) -> Tactic {
        Tactic {
            id: new_id(),
            description: self.description,
            frequency: self.frequency,
            target: self.target.max(1),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticPatch {
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub target: Option<u32>,
}

// ---------------------------------------------------------------------------
// Goal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tactics: Vec<Tactic>,
    /// Name of the measured outcome, e.g. "Total revenue".
    #[serde(default)]
    pub lag_indicator: String,
    #[serde(default)]
    pub target_lag_value: f64,
    /// User-entered; never derived from weekly execution.
    #[serde(default)]
    pub current_lag_value: f64,
}

impl Goal {
    fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: String::new(),
            tactics: Vec::new(),
            lag_indicator: String::new(),
            target_lag_value: 0.0,
            current_lag_value: 0.0,
        }
    }

    pub fn tactic(&self, id: &str) -> Option<&Tactic> {
        self.tactics.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub lag_indicator: Option<String>,
    pub target_lag_value: Option<f64>,
    pub current_lag_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// WeeklyExecution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyExecution {
    pub week_number: u32,
    /// Tactic id → repetitions done this week. Entries for deleted tactics
    /// are kept and ignored by scoring.
    #[serde(default)]
    pub completions: BTreeMap<String, u32>,
    #[serde(default)]
    pub reflections: String,
    #[serde(default)]
    pub score: u32,
}

impl WeeklyExecution {
    pub fn empty(week_number: u32) -> Self {
        Self {
            week_number,
            completions: BTreeMap::new(),
            reflections: String::new(),
            score: 0,
        }
    }

    pub fn count(&self, tactic_id: &str) -> u32 {
        self.completions.get(tactic_id).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// One 12-week planning cycle. The aggregate root of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub vision: String,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub executions: Vec<WeeklyExecution>,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default)]
    pub streak: u32,
}

impl Cycle {
    /// A fresh cycle starting now.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(start_date: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            start_date,
            vision: String::new(),
            goals: Vec::new(),
            executions: (1..=WEEKS_PER_CYCLE).map(WeeklyExecution::empty).collect(),
            onboarding_completed: false,
            streak: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn goal(&self, id: &str) -> Result<&Goal> {
        self.goals
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| CatalystError::GoalNotFound(id.to_string()))
    }

    pub fn week(&self, week_number: u32) -> Result<&WeeklyExecution> {
        let idx = week_index(week_number)?;
        self.executions
            .get(idx)
            .ok_or(CatalystError::WeekOutOfRange(week_number))
    }

    pub fn tactics(&self) -> impl Iterator<Item = &Tactic> {
        self.goals.iter().flat_map(|g| g.tactics.iter())
    }

    pub fn find_tactic(&self, tactic_id: &str) -> Option<&Tactic> {
        self.tactics().find(|t| t.id == tactic_id)
    }

    pub fn is_full(&self) -> bool {
        self.goals.len() >= MAX_GOALS
    }

    /// Week of the cycle that contains `now`, clamped to 1..=12.
    pub fn current_week(&self, now: DateTime<Utc>) -> u32 {
        let days = self.days_elapsed(now);
        let week = days / 7 + 1;
        week.clamp(1, WEEKS_PER_CYCLE as i64) as u32
    }

    pub fn days_elapsed(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_date).num_days().max(0)
    }

    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        (DAYS_PER_CYCLE - self.days_elapsed(now)).clamp(0, DAYS_PER_CYCLE)
    }

    // -----------------------------------------------------------------------
    // Vision & onboarding
    // -----------------------------------------------------------------------

    pub fn set_vision(&mut self, vision: impl Into<String>) {
        self.vision = vision.into();
    }

    pub fn complete_onboarding(&mut self, vision: Option<String>) {
        if let Some(v) = vision {
            self.vision = v;
        }
        self.onboarding_completed = true;
    }

    // -----------------------------------------------------------------------
    // Goals
    // -----------------------------------------------------------------------

    /// Append a goal. Returns `None` (and changes nothing) when the cycle
    /// already holds the maximum number of goals.
    pub fn add_goal(&mut self, title: impl Into<String>) -> Option<String> {
        if self.is_full() {
            return None;
        }
        let goal = Goal::new(title);
        let id = goal.id.clone();
        self.goals.push(goal);
        Some(id)
    }

    pub fn update_goal(&mut self, id: &str, patch: GoalPatch) -> Result<()> {
        let goal = self.goal_mut(id)?;
        if let Some(title) = patch.title {
            goal.title = title;
        }
        if let Some(description) = patch.description {
            goal.description = description;
        }
        if let Some(lag) = patch.lag_indicator {
            goal.lag_indicator = lag;
        }
        if let Some(v) = patch.target_lag_value {
            goal.target_lag_value = v;
        }
        if let Some(v) = patch.current_lag_value {
            goal.current_lag_value = v;
        }
        Ok(())
    }

    /// Remove a goal together with its tactics and rescore every week.
    pub fn remove_goal(&mut self, id: &str) -> Result<()> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() == before {
            return Err(CatalystError::GoalNotFound(id.to_string()));
        }
        self.rescore_all();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Tactics
    // -----------------------------------------------------------------------

    pub fn add_tactic(&mut self, goal_id: &str, draft: TacticDraft) -> Result<String> {
        let tactic = draft.into_tactic();
        let id = tactic.id.clone();
        self.goal_mut(goal_id)?.tactics.push(tactic);
        self.rescore_all();
        Ok(id)
    }

    /// Append several tactics at once (coaching suggestions).
    pub fn merge_suggested_tactics(
        &mut self,
        goal_id: &str,
        drafts: Vec<TacticDraft>,
    ) -> Result<Vec<String>> {
        let goal = self.goal_mut(goal_id)?;
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let tactic = draft.into_tactic();
            ids.push(tactic.id.clone());
            goal.tactics.push(tactic);
        }
        self.rescore_all();
        Ok(ids)
    }

    pub fn update_tactic(&mut self, goal_id: &str, tactic_id: &str, patch: TacticPatch) -> Result<()> {
        let tactic = self
            .goal_mut(goal_id)?
            .tactics
            .iter_mut()
            .find(|t| t.id == tactic_id)
            .ok_or_else(|| CatalystError::TacticNotFound(tactic_id.to_string()))?;
        if let Some(description) = patch.description {
            tactic.description = description;
        }
        if let Some(frequency) = patch.frequency {
            tactic.frequency = frequency;
        }
        let retargeted = patch.target.is_some();
        if let Some(target) = patch.target {
            tactic.target = target.max(1);
        }
        if retargeted {
            self.rescore_all();
        }
        Ok(())
    }

    /// Remove a tactic. Its completion entries stay in the weekly records
    /// (ignored by scoring); every week is rescored.
    pub fn remove_tactic(&mut self, goal_id: &str, tactic_id: &str) -> Result<()> {
        let goal = self.goal_mut(goal_id)?;
        let before = goal.tactics.len();
        goal.tactics.retain(|t| t.id != tactic_id);
        if goal.tactics.len() == before {
            return Err(CatalystError::TacticNotFound(tactic_id.to_string()));
        }
        self.rescore_all();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Weekly execution
    // -----------------------------------------------------------------------

    /// Advance the completion count of `tactic_id` in `week_number` (cyclic,
    /// see [`score::next_completion_count`]) and rescore that week. The week
    /// record is replaced as a whole. Returns the new count.
    pub fn toggle_completion(&mut self, week_number: u32, tactic_id: &str) -> Result<u32> {
        let target = self
            .find_tactic(tactic_id)
            .map(|t| t.target)
            .ok_or_else(|| CatalystError::TacticNotFound(tactic_id.to_string()))?;
        let current = self.week(week_number)?;
        let next = score::toggle(current, &self.goals, tactic_id, target);
        let count = next.count(tactic_id);
        *self.week_mut(week_number)? = next;
        Ok(count)
    }

    pub fn set_reflections(&mut self, week_number: u32, text: impl Into<String>) -> Result<()> {
        self.week_mut(week_number)?.reflections = text.into();
        Ok(())
    }

    /// Recompute every week's score from the current goal/tactic set.
    pub fn rescore_all(&mut self) {
        for execution in &mut self.executions {
            execution.score = score::recompute_score(&self.goals, &execution.completions);
        }
    }

    pub fn refresh_streak(&mut self, now: DateTime<Utc>) {
        self.streak = score::streak(&self.executions, self.current_week(now));
    }

    // -----------------------------------------------------------------------
    // Document repair
    // -----------------------------------------------------------------------

    /// Restore structural invariants on a document read from storage:
    /// exactly weeks 1..=12 in order, every tactic target >= 1, fresh scores.
    /// More than [`MAX_GOALS`] goals is rejected rather than truncated.
    pub fn repair(mut self) -> Result<Self> {
        if self.goals.len() > MAX_GOALS {
            return Err(CatalystError::InvalidDocument(format!(
                "{} goals (at most {MAX_GOALS} allowed)",
                self.goals.len()
            )));
        }
        for goal in &mut self.goals {
            for tactic in &mut goal.tactics {
                tactic.target = tactic.target.max(1);
            }
        }

        let mut by_week: BTreeMap<u32, WeeklyExecution> = BTreeMap::new();
        for execution in self.executions.drain(..) {
            if (1..=WEEKS_PER_CYCLE).contains(&execution.week_number) {
                by_week.entry(execution.week_number).or_insert(execution);
            }
        }
        self.executions = (1..=WEEKS_PER_CYCLE)
            .map(|n| by_week.remove(&n).unwrap_or_else(|| WeeklyExecution::empty(n)))
            .collect();

        self.rescore_all();
        Ok(self)
    }

    fn week_mut(&mut self, week_number: u32) -> Result<&mut WeeklyExecution> {
        let idx = week_index(week_number)?;
        self.executions
            .get_mut(idx)
            .ok_or(CatalystError::WeekOutOfRange(week_number))
    }

    fn goal_mut(&mut self, id: &str) -> Result<&mut Goal> {
        self.goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| CatalystError::GoalNotFound(id.to_string()))
    }
}

impl Default for Cycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero-based index for a 1-based week number.
pub fn week_index(week_number: u32) -> Result<usize> {
    if !(1..=WEEKS_PER_CYCLE).contains(&week_number) {
        return Err(CatalystError::WeekOutOfRange(week_number));
    }
    Ok((week_number - 1) as usize)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
