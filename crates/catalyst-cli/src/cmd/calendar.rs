use super::Session;
use crate::output::print_json;
use anyhow::Context;
use catalyst_core::calendar::{self, BlockSchedule};
use catalyst_core::{io, types::BlockKind};
use chrono::Utc;
use std::path::{Path, PathBuf};

pub fn run(
    root: &Path,
    kind: Option<&str>,
    hour: Option<u32>,
    output: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root)?;
    let defaults = &session.config.calendar;
    let kind = match kind {
        Some(k) => k.parse::<BlockKind>()?,
        None => defaults.block,
    };
    let schedule = BlockSchedule {
        kind,
        start_hour: hour.unwrap_or(defaults.start_hour),
    };

    let ics = calendar::export_ics(session.cycle(), schedule, Utc::now())?;
    let path = output.unwrap_or_else(|| PathBuf::from(calendar::file_name(kind)));
    io::atomic_write(&path, ics.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if json {
        return print_json(&serde_json::json!({
            "path": path,
            "kind": kind,
            "startHour": schedule.start_hour,
            "minutes": kind.default_minutes(),
        }));
    }
    println!(
        "Wrote {} ({} daily at {:02}:00 UTC for 84 days).",
        path.display(),
        kind.title(),
        schedule.start_hour
    );
    Ok(())
}
