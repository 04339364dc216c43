use crate::cycle::{Cycle, Goal, WEEKS_PER_CYCLE};
use crate::score::{self, ScoreBand, ON_TRACK_SCORE};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// CycleSummary
// ---------------------------------------------------------------------------

/// Dashboard view of a cycle at a point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub cycle_id: String,
    pub vision: String,
    pub current_week: u32,
    pub days_left: i64,
    /// Sum of all twelve week scores divided by twelve.
    pub average_score: f64,
    pub on_track: bool,
    pub streak: u32,
    pub current_band: ScoreBand,
    pub chart: Vec<ChartPoint>,
    pub goals: Vec<GoalProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// `W1` .. `W12`.
    pub week: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub id: String,
    pub title: String,
    pub lag_indicator: String,
    pub current_lag_value: f64,
    pub target_lag_value: f64,
    /// 0-100; 0 when the goal has no positive target.
    pub percent: f64,
    pub tactic_count: usize,
}

impl GoalProgress {
    fn of(goal: &Goal) -> Self {
        let percent = if goal.target_lag_value > 0.0 {
            (goal.current_lag_value / goal.target_lag_value * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            lag_indicator: goal.lag_indicator.clone(),
            current_lag_value: goal.current_lag_value,
            target_lag_value: goal.target_lag_value,
            percent,
            tactic_count: goal.tactics.len(),
        }
    }
}

impl CycleSummary {
    pub fn of(cycle: &Cycle, now: DateTime<Utc>) -> Self {
        let total: u32 = cycle.executions.iter().map(|e| e.score).sum();
        let average_score = f64::from(total) / f64::from(WEEKS_PER_CYCLE);
        let current_week = cycle.current_week(now);
        let current_score = cycle.week(current_week).map(|w| w.score).unwrap_or(0);

        Self {
            cycle_id: cycle.id.clone(),
            vision: cycle.vision.clone(),
            current_week,
            days_left: cycle.days_left(now),
            average_score,
            on_track: average_score >= f64::from(ON_TRACK_SCORE),
            streak: score::streak(&cycle.executions, current_week),
            current_band: ScoreBand::of(current_score),
            chart: cycle
                .executions
                .iter()
                .map(|e| ChartPoint {
                    week: format!("W{}", e.week_number),
                    score: e.score,
                })
                .collect(),
            goals: cycle.goals.iter().map(GoalProgress::of).collect(),
        }
    }

    /// Average rounded to a whole percentage for display.
    pub fn average_percent(&self) -> u32 {
        self.average_score.round() as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
