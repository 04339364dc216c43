use crate::cycle::{Goal, WeeklyExecution};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekly score at or above which a week counts as executed.
pub const ON_TRACK_SCORE: u32 = 85;
pub const AT_RISK_SCORE: u32 = 70;

// ---------------------------------------------------------------------------
// Score computation
// ---------------------------------------------------------------------------

/// Percentage of the week's total tactic-target capacity fulfilled, 0-100.
///
/// Each tactic contributes at most its own target, so over-completing one
/// tactic never compensates for another. Completion entries for tactics that
/// no longer exist are ignored. With no tactics at all the score is 0.
pub fn recompute_score(goals: &[Goal], completions: &BTreeMap<String, u32>) -> u32 {
    let mut total_target: u64 = 0;
    let mut total_done: u64 = 0;
    for tactic in goals.iter().flat_map(|g| g.tactics.iter()) {
        let target = u64::from(tactic.target);
        let done = u64::from(completions.get(&tactic.id).copied().unwrap_or(0));
        total_target += target;
        total_done += done.min(target);
    }
    if total_target == 0 {
        return 0;
    }
    // round(100 * done / target), half rounding up
    ((200 * total_done + total_target) / (2 * total_target)) as u32
}

/// Next completion count for one tap: +1 up to `target`, then back to 0.
pub fn next_completion_count(current: u32, target: u32) -> u32 {
    if current >= target {
        0
    } else {
        current + 1
    }
}

/// Replacement record for `execution` after one toggle of `tactic_id`:
/// completions and score change together.
pub fn toggle(
    execution: &WeeklyExecution,
    goals: &[Goal],
    tactic_id: &str,
    target: u32,
) -> WeeklyExecution {
    let mut completions = execution.completions.clone();
    let next = next_completion_count(execution.count(tactic_id), target);
    completions.insert(tactic_id.to_string(), next);
    let score = recompute_score(goals, &completions);
    WeeklyExecution {
        week_number: execution.week_number,
        completions,
        reflections: execution.reflections.clone(),
        score,
    }
}

// ---------------------------------------------------------------------------
// ScoreBand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    OnTrack,
    AtRisk,
    OffTrack,
}

impl ScoreBand {
    pub fn of(score: u32) -> Self {
        if score >= ON_TRACK_SCORE {
            ScoreBand::OnTrack
        } else if score >= AT_RISK_SCORE {
            ScoreBand::AtRisk
        } else {
            ScoreBand::OffTrack
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreBand::OnTrack => "on_track",
            ScoreBand::AtRisk => "at_risk",
            ScoreBand::OffTrack => "off_track",
        }
    }
}

/// A week that has started but is below target is eligible for a recovery plan.
pub fn is_recoverable(score: u32) -> bool {
    score > 0 && score < ON_TRACK_SCORE
}

// ---------------------------------------------------------------------------
// Streak
// ---------------------------------------------------------------------------

/// Consecutive on-track weeks counting back from `current_week`.
///
/// The current week counts once it reaches [`ON_TRACK_SCORE`]; until then it
/// is skipped rather than breaking the run. Any earlier week below target
/// ends the streak.
pub fn streak(executions: &[WeeklyExecution], current_week: u32) -> u32 {
    let score_of = |week: u32| {
        executions
            .iter()
            .find(|e| e.week_number == week)
            .map(|e| e.score)
            .unwrap_or(0)
    };

    if current_week == 0 {
        return 0;
    }
    let mut count = 0;
    if score_of(current_week) >= ON_TRACK_SCORE {
        count += 1;
    }
    for week in (1..current_week).rev() {
        if score_of(week) < ON_TRACK_SCORE {
            break;
        }
        count += 1;
    }
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::Tactic;
    use crate::types::Frequency;

    fn tactic(id: &str, target: u32) -> Tactic {
        Tactic {
            id: id.to_string(),
            description: format!("tactic {id}"),
            frequency: Frequency::Weekly,
            target,
        }
    }

    fn goal(tactics: Vec<Tactic>) -> Goal {
        Goal {
            id: "g".into(),
            title: "goal".into(),
            description: String::new(),
            tactics,
            lag_indicator: String::new(),
            target_lag_value: 0.0,
            current_lag_value: 0.0,
        }
    }

    fn completions(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn week_with_score(week_number: u32, score: u32) -> WeeklyExecution {
        WeeklyExecution {
            score,
            ..WeeklyExecution::empty(week_number)
        }
    }

    #[test]
    fn worked_example_scores_eighty() {
        let goals = vec![goal(vec![tactic("t1", 3), tactic("t2", 2)])];
        let c = completions(&[("t1", 3), ("t2", 1)]);
        assert_eq!(recompute_score(&goals, &c), 80);
    }

    #[test]
    fn no_tactics_scores_zero() {
        assert_eq!(recompute_score(&[], &completions(&[("x", 4)])), 0);
        assert_eq!(recompute_score(&[goal(vec![])], &BTreeMap::new()), 0);
    }

    #[test]
    fn all_targets_met_scores_hundred() {
        let goals = vec![
            goal(vec![tactic("a", 1), tactic("b", 7)]),
            goal(vec![tactic("c", 2)]),
        ];
        let c = completions(&[("a", 1), ("b", 9), ("c", 2)]);
        assert_eq!(recompute_score(&goals, &c), 100);
    }

    #[test]
    fn over_completion_is_clamped_per_tactic() {
        let goals = vec![goal(vec![tactic("a", 2), tactic("b", 2)])];
        let exact = recompute_score(&goals, &completions(&[("a", 2)]));
        let over = recompute_score(&goals, &completions(&[("a", 50)]));
        assert_eq!(exact, 50);
        assert_eq!(over, exact);
    }

    #[test]
    fn stale_completions_are_ignored() {
        let goals = vec![goal(vec![tactic("a", 4)])];
        let c = completions(&[("a", 1), ("deleted", 10)]);
        assert_eq!(recompute_score(&goals, &c), 25);
    }

    #[test]
    fn score_is_always_within_bounds() {
        let goals = vec![goal(vec![tactic("a", 3), tactic("b", 5), tactic("c", 1)])];
        for a in 0..6 {
            for b in 0..8 {
                for c in 0..3 {
                    let s = recompute_score(&goals, &completions(&[("a", a), ("b", b), ("c", c)]));
                    assert!(s <= 100, "score {s} out of range");
                }
            }
        }
    }

    #[test]
    fn rounding_is_half_up() {
        // 1/8 = 12.5% -> 13
        let goals = vec![goal(vec![tactic("a", 8)])];
        assert_eq!(recompute_score(&goals, &completions(&[("a", 1)])), 13);
        // 2/3 = 66.67% -> 67
        let goals = vec![goal(vec![tactic("a", 3)])];
        assert_eq!(recompute_score(&goals, &completions(&[("a", 2)])), 67);
    }

    #[test]
    fn toggle_is_periodic_with_period_target_plus_one() {
        for target in 1..=5 {
            let mut count = 0;
            for _ in 0..target {
                count = next_completion_count(count, target);
            }
            assert_eq!(count, target);
            count = next_completion_count(count, target);
            assert_eq!(count, 0, "target {target} should reset after reaching it");
        }
    }

    #[test]
    fn toggle_target_one_sequence() {
        let goals = vec![goal(vec![tactic("t", 1)])];
        let mut week = WeeklyExecution::empty(1);
        let mut seen = Vec::new();
        for _ in 0..3 {
            week = toggle(&week, &goals, "t", 1);
            seen.push(week.count("t"));
        }
        assert_eq!(seen, vec![1, 0, 1]);
        assert_eq!(week.score, 100);
    }

    #[test]
    fn toggle_keeps_reflections_and_week_number() {
        let goals = vec![goal(vec![tactic("t", 2)])];
        let week = WeeklyExecution {
            reflections: "slow start".into(),
            ..WeeklyExecution::empty(5)
        };
        let next = toggle(&week, &goals, "t", 2);
        assert_eq!(next.week_number, 5);
        assert_eq!(next.reflections, "slow start");
        assert_eq!(next.score, 50);
    }

    #[test]
    fn score_bands() {
        assert_eq!(ScoreBand::of(100), ScoreBand::OnTrack);
        assert_eq!(ScoreBand::of(85), ScoreBand::OnTrack);
        assert_eq!(ScoreBand::of(84), ScoreBand::AtRisk);
        assert_eq!(ScoreBand::of(70), ScoreBand::AtRisk);
        assert_eq!(ScoreBand::of(69), ScoreBand::OffTrack);
        assert!(is_recoverable(40));
        assert!(!is_recoverable(0));
        assert!(!is_recoverable(85));
    }

    #[test]
    fn streak_counts_back_from_current_week() {
        let weeks: Vec<_> = [90, 40, 88, 95, 85, 10]
            .iter()
            .enumerate()
            .map(|(i, s)| week_with_score(i as u32 + 1, *s))
            .collect();
        // current week 6 is in progress (10) and is skipped
        assert_eq!(streak(&weeks, 6), 3);
        // current week 5 already on track
        assert_eq!(streak(&weeks, 5), 3);
        assert_eq!(streak(&weeks, 2), 1);
        assert_eq!(streak(&weeks, 1), 1);
    }

    #[test]
    fn streak_breaks_on_first_low_week() {
        let weeks: Vec<_> = [85, 85, 60, 20]
            .iter()
            .enumerate()
            .map(|(i, s)| week_with_score(i as u32 + 1, *s))
            .collect();
        assert_eq!(streak(&weeks, 4), 0);
        assert_eq!(streak(&weeks, 0), 0);
    }
}
