use super::{resolve_goal_id, short_id, Session};
use crate::output::{print_json, print_table};
use catalyst_core::cycle::{GoalPatch, MAX_GOALS};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum GoalSubcommand {
    /// List goals with their tactics
    List,

    /// Add a goal (a cycle holds at most three)
    Add {
        /// Goal title
        title: String,
    },

    /// Edit a goal's fields; only the given flags change
    Update {
        /// Goal id, id prefix, or position (1-3)
        goal: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Name of the lag measure, e.g. "Monthly revenue"
        #[arg(long)]
        lag: Option<String>,
        /// Target value of the lag measure
        #[arg(long)]
        target: Option<f64>,
        /// Current value of the lag measure
        #[arg(long)]
        current: Option<f64>,
    },

    /// Remove a goal and its tactics
    Remove {
        /// Goal id, id prefix, or position (1-3)
        goal: String,
    },
}

pub fn run(root: &Path, subcmd: GoalSubcommand, json: bool) -> anyhow::Result<()> {
    let mut session = Session::open(root)?;
    match subcmd {
        GoalSubcommand::List => list(&session, json),
        GoalSubcommand::Add { title } => add(&mut session, title, json),
        GoalSubcommand::Update {
            goal,
            title,
            description,
            lag,
            target,
            current,
        } => {
            let patch = GoalPatch {
                title,
                description,
                lag_indicator: lag,
                target_lag_value: target,
                current_lag_value: current,
            };
            update(&mut session, &goal, patch, json)
        }
        GoalSubcommand::Remove { goal } => remove(&mut session, &goal, json),
    }
}

fn list(session: &Session, json: bool) -> anyhow::Result<()> {
    let goals = &session.cycle().goals;
    if json {
        return print_json(goals);
    }
    if goals.is_empty() {
        println!("No goals yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = goals
        .iter()
        .enumerate()
        .flat_map(|(i, g)| {
            let head = vec![
                (i + 1).to_string(),
                short_id(&g.id).to_string(),
                g.title.clone(),
                String::new(),
            ];
            let tactics = g.tactics.iter().map(|t| {
                vec![
                    String::new(),
                    short_id(&t.id).to_string(),
                    format!("  - {}", t.description),
                    format!("{}x {}", t.target, t.frequency),
                ]
            });
            std::iter::once(head).chain(tactics).collect::<Vec<_>>()
        })
        .collect();
    print_table(&["#", "ID", "GOAL / TACTIC", "TARGET"], rows);
    Ok(())
}

fn add(session: &mut Session, title: String, json: bool) -> anyhow::Result<()> {
    let id = session.edit(|c| Ok(c.add_goal(title)))?;
    let Some(id) = id else {
        if json {
            return print_json(&serde_json::json!({ "applied": false, "id": null }));
        }
        println!("Not applied: a cycle holds at most {MAX_GOALS} goals.");
        return Ok(());
    };
    if json {
        return print_json(&serde_json::json!({ "applied": true, "id": id }));
    }
    println!("Added goal {} ({} of {MAX_GOALS}).", short_id(&id), session.cycle().goals.len());
    Ok(())
}

fn update(session: &mut Session, key: &str, patch: GoalPatch, json: bool) -> anyhow::Result<()> {
    let id = resolve_goal_id(session.cycle(), key)?;
    session.edit(|c| c.update_goal(&id, patch))?;
    let goal = session.cycle().goal(&id)?;
    if json {
        return print_json(goal);
    }
    println!("Updated goal {}: {}", short_id(&id), goal.title);
    Ok(())
}

fn remove(session: &mut Session, key: &str, json: bool) -> anyhow::Result<()> {
    let id = resolve_goal_id(session.cycle(), key)?;
    session.edit(|c| c.remove_goal(&id))?;
    if json {
        return print_json(&serde_json::json!({ "removed": id }));
    }
    println!("Removed goal {}.", short_id(&id));
    Ok(())
}
