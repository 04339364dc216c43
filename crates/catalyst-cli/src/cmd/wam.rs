use super::Session;
use crate::output::print_json;
use catalyst_core::accountability::MeetingBrief;
use chrono::Utc;
use std::path::Path;

/// Print the accountability meeting agenda for last week, or for `week`.
pub fn run(root: &Path, week: Option<u32>, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let brief = match week {
        Some(w) => MeetingBrief::reviewing(session.cycle(), w)?,
        None => MeetingBrief::of(session.cycle(), Utc::now()),
    };

    if json {
        return print_json(&brief);
    }

    println!("Weekly Accountability Meeting ({} minutes max)", brief.minutes);
    for item in &brief.agenda {
        println!("\n{}. {}", item.step, item.title);
        println!("   {}", item.prompt);
        for note in &item.notes {
            println!("   - {note}");
        }
    }
    Ok(())
}
