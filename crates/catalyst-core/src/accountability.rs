use crate::cycle::{Cycle, WEEKS_PER_CYCLE};
use crate::error::{CatalystError, Result};
use crate::score::ScoreBand;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A weekly accountability meeting is timeboxed to this many minutes.
pub const MEETING_MINUTES: u32 = 15;

// ---------------------------------------------------------------------------
// MeetingBrief
// ---------------------------------------------------------------------------

/// Agenda for a weekly accountability meeting, filled in from the cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingBrief {
    /// The week being reported on; `None` before the first week is over.
    pub reviewed_week: Option<u32>,
    pub score: Option<u32>,
    pub band: Option<ScoreBand>,
    pub minutes: u32,
    pub agenda: Vec<AgendaItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub step: u32,
    pub title: &'static str,
    pub prompt: &'static str,
    /// What the cycle already says about this step.
    pub notes: Vec<String>,
}

impl MeetingBrief {
    /// Brief for a meeting held at `now`: it reviews the previous week.
    pub fn of(cycle: &Cycle, now: DateTime<Utc>) -> Self {
        let previous = cycle.current_week(now).saturating_sub(1);
        if previous == 0 {
            Self::build(cycle, None)
        } else {
            Self::build(cycle, Some(previous))
        }
    }

    /// Brief reviewing an explicit week, 1..=12.
    pub fn reviewing(cycle: &Cycle, week: u32) -> Result<Self> {
        if !(1..=WEEKS_PER_CYCLE).contains(&week) {
            return Err(CatalystError::WeekOutOfRange(week));
        }
        Ok(Self::build(cycle, Some(week)))
    }

    fn build(cycle: &Cycle, reviewed_week: Option<u32>) -> Self {
        let execution = reviewed_week.and_then(|w| cycle.week(w).ok());
        let score = execution.map(|e| e.score);
        let band = score.map(ScoreBand::of);

        let vision = if cycle.vision.trim().is_empty() {
            vec!["No vision set yet.".to_string()]
        } else {
            vec![cycle.vision.clone()]
        };
        let report = match (reviewed_week, score, band) {
            (Some(w), Some(s), Some(b)) => vec![format!("Week {w}: {s}% ({})", b.as_str())],
            _ => vec!["Nothing to report before the first week ends.".to_string()],
        };
        let reflections = execution
            .map(|e| e.reflections.trim())
            .filter(|r| !r.is_empty())
            .map(|r| vec![r.to_string()])
            .unwrap_or_default();
        let intentions = cycle
            .tactics()
            .map(|t| format!("{} ({} x{})", t.description, t.frequency, t.target))
            .collect();

        Self {
            reviewed_week,
            score,
            band,
            minutes: MEETING_MINUTES,
            agenda: vec![
                AgendaItem {
                    step: 1,
                    title: "Review Vision",
                    prompt: "Share your compelling vision with the group.",
                    notes: vision,
                },
                AgendaItem {
                    step: 2,
                    title: "Last Week's Score",
                    prompt: "Report your execution percentage. Be honest.",
                    notes: report,
                },
                AgendaItem {
                    step: 3,
                    title: "Successes & Failures",
                    prompt: "What went right? What blocked you?",
                    notes: reflections,
                },
                AgendaItem {
                    step: 4,
                    title: "Next Week's Intentions",
                    prompt: "Which tactics are you committing to?",
                    notes: intentions,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::TacticDraft;
    use crate::types::Frequency;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 6, 0, 0).unwrap()
    }

    #[test]
    fn first_week_has_nothing_to_review() {
        let cycle = Cycle::starting_at(start());
        let brief = MeetingBrief::of(&cycle, start());
        assert_eq!(brief.reviewed_week, None);
        assert_eq!(brief.score, None);
        assert_eq!(brief.minutes, 15);
        let titles: Vec<&str> = brief.agenda.iter().map(|a| a.title).collect();
        assert_eq!(
            titles,
            vec![
                "Review Vision",
                "Last Week's Score",
                "Successes & Failures",
                "Next Week's Intentions"
            ]
        );
        assert_eq!(brief.agenda[0].notes, vec!["No vision set yet."]);
    }

    #[test]
    fn reviews_previous_week() {
        let mut cycle = Cycle::starting_at(start());
        cycle.set_vision("Run a calm studio");
        let goal = cycle.add_goal("Ship").unwrap();
        let tactic = cycle
            .add_tactic(&goal, TacticDraft::new("Write", Frequency::Daily, 4))
            .unwrap();
        for _ in 0..3 {
            cycle.toggle_completion(2, &tactic).unwrap();
        }
        cycle.set_reflections(2, "Meetings ate Tuesday").unwrap();

        let brief = MeetingBrief::of(&cycle, start() + Duration::days(15));
        assert_eq!(brief.reviewed_week, Some(2));
        assert_eq!(brief.score, Some(75));
        assert_eq!(brief.band, Some(ScoreBand::AtRisk));
        assert_eq!(brief.agenda[0].notes, vec!["Run a calm studio"]);
        assert_eq!(brief.agenda[1].notes, vec!["Week 2: 75% (at_risk)"]);
        assert_eq!(brief.agenda[2].notes, vec!["Meetings ate Tuesday"]);
        assert_eq!(brief.agenda[3].notes, vec!["Write (daily x4)"]);
    }

    #[test]
    fn explicit_week_is_range_checked() {
        let cycle = Cycle::starting_at(start());
        assert!(matches!(
            MeetingBrief::reviewing(&cycle, 13),
            Err(CatalystError::WeekOutOfRange(13))
        ));
        let brief = MeetingBrief::reviewing(&cycle, 12).unwrap();
        assert_eq!(brief.score, Some(0));
        assert_eq!(brief.band, Some(ScoreBand::OffTrack));
    }
}
