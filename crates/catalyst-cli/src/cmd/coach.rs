use super::{block_on, Session};
use crate::output::print_json;
use catalyst_core::score;
use chrono::Utc;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum CoachSubcommand {
    /// Critique of the vision and goals, with three power actions
    Feedback,

    /// Corrective plan for a week that fell short of 85%
    Recover {
        /// Week number 1-12 (default: the current week)
        week: Option<u32>,
    },
}

pub fn run(root: &Path, subcmd: CoachSubcommand, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let coach = session.coach()?;
    let cycle = session.cycle().clone();

    match subcmd {
        CoachSubcommand::Feedback => {
            if cycle.vision.trim().is_empty() && cycle.goals.is_empty() {
                anyhow::bail!("nothing to review yet: set a vision or add a goal first");
            }
            let text =
                block_on(async move { coach.get_feedback(&cycle.vision, &cycle.goals).await })??;
            if json {
                return print_json(&serde_json::json!({ "feedback": text }));
            }
            println!("{text}");
        }
        CoachSubcommand::Recover { week } => {
            let week = week.unwrap_or_else(|| cycle.current_week(Utc::now()));
            let week_score = cycle.week(week)?.score;
            let recoverable = score::is_recoverable(week_score);
            if !json && !recoverable {
                eprintln!("note: week {week} scored {week_score}%, recovery plans target 1-84%");
            }
            let plan =
                block_on(async move { coach.get_corrective_action(&cycle, week).await })??;
            if json {
                return print_json(&serde_json::json!({
                    "week": week,
                    "score": week_score,
                    "recoverable": recoverable,
                    "plan": plan,
                }));
            }
            println!("{plan}");
        }
    }
    Ok(())
}
