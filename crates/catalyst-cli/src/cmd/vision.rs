use super::{block_on, Session};
use crate::output::print_json;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum VisionSubcommand {
    /// Print the current vision
    Show,

    /// Replace the vision text
    Set {
        /// New vision statement
        text: String,
        /// Also mark onboarding as completed
        #[arg(long)]
        complete_onboarding: bool,
    },

    /// Ask the coach to sharpen a draft (default: the current vision)
    Refine {
        /// Draft to refine
        draft: Option<String>,
        /// Store the refined text as the vision
        #[arg(long)]
        apply: bool,
    },

    /// Five reflective questions to help write a vision
    Prompts,
}

pub fn run(root: &Path, subcmd: VisionSubcommand, json: bool) -> anyhow::Result<()> {
    let mut session = Session::open(root)?;
    match subcmd {
        VisionSubcommand::Show => show(&session, json),
        VisionSubcommand::Set {
            text,
            complete_onboarding,
        } => set(&mut session, text, complete_onboarding, json),
        VisionSubcommand::Refine { draft, apply } => refine(&mut session, draft, apply, json),
        VisionSubcommand::Prompts => prompts(&session, json),
    }
}

fn show(session: &Session, json: bool) -> anyhow::Result<()> {
    let cycle = session.cycle();
    if json {
        return print_json(&serde_json::json!({
            "vision": cycle.vision,
            "onboardingCompleted": cycle.onboarding_completed,
        }));
    }
    if cycle.vision.is_empty() {
        println!("No vision yet. Try `catalyst vision prompts` for inspiration.");
    } else {
        println!("{}", cycle.vision);
    }
    Ok(())
}

fn set(session: &mut Session, text: String, complete: bool, json: bool) -> anyhow::Result<()> {
    session.edit(|c| {
        if complete {
            c.complete_onboarding(Some(text));
        } else {
            c.set_vision(text);
        }
        Ok(())
    })?;
    if json {
        return print_json(session.cycle());
    }
    println!("Vision updated.");
    Ok(())
}

fn refine(
    session: &mut Session,
    draft: Option<String>,
    apply: bool,
    json: bool,
) -> anyhow::Result<()> {
    let draft = draft.unwrap_or_else(|| session.cycle().vision.clone());
    if draft.trim().is_empty() {
        anyhow::bail!("nothing to refine: pass a draft or set a vision first");
    }
    let coach = session.coach()?;
    let refined = block_on(async move { coach.refine_vision(&draft).await })??;

    if apply {
        let text = refined.clone();
        session.edit(|c| {
            c.set_vision(text);
            Ok(())
        })?;
    }

    if json {
        return print_json(&serde_json::json!({ "vision": refined, "applied": apply }));
    }
    println!("{refined}");
    if apply {
        println!("\n(saved as your vision)");
    }
    Ok(())
}

fn prompts(session: &Session, json: bool) -> anyhow::Result<()> {
    let coach = session.coach()?;
    let prompts = block_on(async move { coach.generate_vision_prompts().await })?;
    if json {
        return print_json(&serde_json::json!({
            "fallback": prompts.is_fallback(),
            "prompts": prompts.value(),
        }));
    }
    for (i, p) in prompts.value().iter().enumerate() {
        println!("{}. {p}", i + 1);
    }
    Ok(())
}
