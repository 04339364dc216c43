use super::{block_on, resolve_goal_id, resolve_tactic_id, short_id, Session};
use crate::output::{print_json, print_table};
use catalyst_core::cycle::{Cycle, TacticDraft, TacticPatch};
use catalyst_core::types::Frequency;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum TacticSubcommand {
    /// Add a tactic to a goal
    Add {
        /// Goal id, id prefix, or position (1-3)
        goal: String,
        /// What you will do
        description: String,
        /// daily or weekly
        #[arg(long, default_value = "weekly")]
        frequency: Frequency,
        /// Completions expected per week
        #[arg(long, default_value = "1")]
        target: u32,
    },

    /// Edit a tactic; changing the target rescores every week
    Update {
        /// Tactic id or id prefix
        tactic: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        frequency: Option<Frequency>,
        #[arg(long)]
        target: Option<u32>,
    },

    /// Remove a tactic; recorded completions stay but no longer count
    Remove {
        /// Tactic id or id prefix
        tactic: String,
    },

    /// Ask the coach for tactics and add them to the goal
    Suggest {
        /// Goal id, id prefix, or position (1-3)
        goal: String,
    },
}

pub fn run(root: &Path, subcmd: TacticSubcommand, json: bool) -> anyhow::Result<()> {
    let mut session = Session::open(root)?;
    match subcmd {
        TacticSubcommand::Add {
            goal,
            description,
            frequency,
            target,
        } => add(
            &mut session,
            &goal,
            TacticDraft::new(description, frequency, target),
            json,
        ),
        TacticSubcommand::Update {
            tactic,
            description,
            frequency,
            target,
        } => {
            let patch = TacticPatch {
                description,
                frequency,
                target,
            };
            update(&mut session, &tactic, patch, json)
        }
        TacticSubcommand::Remove { tactic } => remove(&mut session, &tactic, json),
        TacticSubcommand::Suggest { goal } => suggest(&mut session, &goal, json),
    }
}

/// Goal that owns `tactic_id`.
fn owner_of(cycle: &Cycle, tactic_id: &str) -> anyhow::Result<String> {
    cycle
        .goals
        .iter()
        .find(|g| g.tactic(tactic_id).is_some())
        .map(|g| g.id.clone())
        .ok_or_else(|| catalyst_core::CatalystError::TacticNotFound(tactic_id.to_string()).into())
}

fn add(session: &mut Session, goal: &str, draft: TacticDraft, json: bool) -> anyhow::Result<()> {
    let goal_id = resolve_goal_id(session.cycle(), goal)?;
    let id = session.edit(|c| c.add_tactic(&goal_id, draft))?;
    if json {
        return print_json(&serde_json::json!({ "id": id, "goalId": goal_id }));
    }
    println!("Added tactic {} to goal {}.", short_id(&id), short_id(&goal_id));
    Ok(())
}

fn update(session: &mut Session, key: &str, patch: TacticPatch, json: bool) -> anyhow::Result<()> {
    let tactic_id = resolve_tactic_id(session.cycle(), key)?;
    let goal_id = owner_of(session.cycle(), &tactic_id)?;
    session.edit(|c| c.update_tactic(&goal_id, &tactic_id, patch))?;
    let tactic = session
        .cycle()
        .find_tactic(&tactic_id)
        .ok_or_else(|| catalyst_core::CatalystError::TacticNotFound(tactic_id.clone()))?;
    if json {
        return print_json(tactic);
    }
    println!(
        "Updated tactic {}: {} ({}x {})",
        short_id(&tactic_id),
        tactic.description,
        tactic.target,
        tactic.frequency
    );
    Ok(())
}

fn remove(session: &mut Session, key: &str, json: bool) -> anyhow::Result<()> {
    let tactic_id = resolve_tactic_id(session.cycle(), key)?;
    let goal_id = owner_of(session.cycle(), &tactic_id)?;
    session.edit(|c| c.remove_tactic(&goal_id, &tactic_id))?;
    if json {
        return print_json(&serde_json::json!({ "removed": tactic_id }));
    }
    println!("Removed tactic {}.", short_id(&tactic_id));
    Ok(())
}

fn suggest(session: &mut Session, goal: &str, json: bool) -> anyhow::Result<()> {
    let goal_id = resolve_goal_id(session.cycle(), goal)?;
    let title = session.cycle().goal(&goal_id)?.title.clone();
    let coach = session.coach()?;
    let suggestions = block_on(async move { coach.suggest_tactics(&title).await })?;
    let fallback = suggestions.is_fallback();
    let drafts = suggestions.into_inner();

    let added = session.edit(|c| c.merge_suggested_tactics(&goal_id, drafts))?;
    tracing::info!(goal = %goal_id, added = added.len(), fallback, "merged suggested tactics");

    if json {
        return print_json(&serde_json::json!({ "added": added, "fallback": fallback }));
    }
    if added.is_empty() {
        println!("The coach had no suggestions this time.");
        return Ok(());
    }
    let goal = session.cycle().goal(&goal_id)?;
    let rows: Vec<Vec<String>> = goal
        .tactics
        .iter()
        .filter(|t| added.contains(&t.id))
        .map(|t| {
            vec![
                short_id(&t.id).to_string(),
                t.description.clone(),
                format!("{}x {}", t.target, t.frequency),
            ]
        })
        .collect();
    print_table(&["ID", "TACTIC", "TARGET"], rows);
    Ok(())
}
