use super::{resolve_tactic_id, short_id, Session};
use crate::output::{bar, print_json, print_table};
use catalyst_core::score::ScoreBand;
use chrono::Utc;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum WeekSubcommand {
    /// Show completions and score for a week
    Show {
        /// Week number 1-12 (default: the current week)
        week: Option<u32>,
    },

    /// Record one more completion of a tactic (wraps to 0 after the target)
    Toggle {
        /// Tactic id or id prefix
        tactic: String,
        /// Week number 1-12 (default: the current week)
        #[arg(long, short = 'w')]
        week: Option<u32>,
    },

    /// Set the reflection notes for a week
    Reflect {
        /// Reflection text
        text: String,
        /// Week number 1-12 (default: the current week)
        #[arg(long, short = 'w')]
        week: Option<u32>,
    },
}

pub fn run(root: &Path, subcmd: WeekSubcommand, json: bool) -> anyhow::Result<()> {
    let mut session = Session::open(root)?;
    let current = session.cycle().current_week(Utc::now());
    match subcmd {
        WeekSubcommand::Show { week } => show(&session, week.unwrap_or(current), json),
        WeekSubcommand::Toggle { tactic, week } => {
            toggle(&mut session, week.unwrap_or(current), &tactic, json)
        }
        WeekSubcommand::Reflect { text, week } => {
            reflect(&mut session, week.unwrap_or(current), text, json)
        }
    }
}

fn show(session: &Session, week: u32, json: bool) -> anyhow::Result<()> {
    let cycle = session.cycle();
    let execution = cycle.week(week)?;
    if json {
        return print_json(execution);
    }

    println!(
        "Week {week}: {}% {} ({})",
        execution.score,
        bar(execution.score),
        ScoreBand::of(execution.score).as_str()
    );
    let rows: Vec<Vec<String>> = cycle
        .tactics()
        .map(|t| {
            vec![
                short_id(&t.id).to_string(),
                t.description.clone(),
                format!("{}/{}", execution.count(&t.id).min(t.target), t.target),
            ]
        })
        .collect();
    if rows.is_empty() {
        println!("No tactics yet.");
    } else {
        print_table(&["ID", "TACTIC", "DONE"], rows);
    }
    if !execution.reflections.is_empty() {
        println!("\nReflections: {}", execution.reflections);
    }
    Ok(())
}

fn toggle(session: &mut Session, week: u32, key: &str, json: bool) -> anyhow::Result<()> {
    let tactic_id = resolve_tactic_id(session.cycle(), key)?;
    let count = session.edit(|c| c.toggle_completion(week, &tactic_id))?;
    let score = session.cycle().week(week)?.score;
    if json {
        return print_json(&serde_json::json!({
            "week": week,
            "tacticId": tactic_id,
            "count": count,
            "score": score,
            "band": ScoreBand::of(score),
        }));
    }
    println!("Week {week}: {} now at {count}. Score {score}%.", short_id(&tactic_id));
    Ok(())
}

fn reflect(session: &mut Session, week: u32, text: String, json: bool) -> anyhow::Result<()> {
    session.edit(|c| c.set_reflections(week, text))?;
    if json {
        return print_json(session.cycle().week(week)?);
    }
    println!("Saved reflections for week {week}.");
    Ok(())
}
