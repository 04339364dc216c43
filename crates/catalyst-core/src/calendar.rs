//! iCalendar export of the daily time block for a cycle.

use crate::cycle::{Cycle, DAYS_PER_CYCLE};
use crate::error::{CatalystError, Result};
use crate::types::BlockKind;
use chrono::{DateTime, Duration, NaiveTime, Utc};

const PRODID: &str = "-//12WY Catalyst//EN";
const ICS_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Options for [`export_ics`].
#[derive(Debug, Clone, Copy)]
pub struct BlockSchedule {
    pub kind: BlockKind,
    /// UTC hour the block starts at.
    pub start_hour: u32,
}

impl Default for BlockSchedule {
    fn default() -> Self {
        Self {
            kind: BlockKind::Strategic,
            start_hour: 9,
        }
    }
}

/// Download name for a block kind, e.g. `strategic_blocks.ics`.
pub fn file_name(kind: BlockKind) -> String {
    format!("{}_blocks.ics", kind.as_str())
}

/// One recurring daily event covering the whole cycle, CRLF line endings.
pub fn export_ics(cycle: &Cycle, schedule: BlockSchedule, now: DateTime<Utc>) -> Result<String> {
    let start_time = NaiveTime::from_hms_opt(schedule.start_hour, 0, 0)
        .ok_or(CatalystError::InvalidHour(schedule.start_hour))?;
    let start = cycle
        .start_date
        .date_naive()
        .and_time(start_time)
        .and_utc();
    let end = start + Duration::minutes(i64::from(schedule.kind.default_minutes()));

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}-{}@catalyst", cycle.id, schedule.kind.as_str()),
        format!("DTSTAMP:{}", now.format(ICS_TIME_FORMAT)),
        format!("SUMMARY:{}", escape_text(&format!("12WY {}", schedule.kind.title()))),
        format!("DESCRIPTION:{}", escape_text(schedule.kind.purpose())),
        format!("DTSTART:{}", start.format(ICS_TIME_FORMAT)),
        format!("DTEND:{}", end.format(ICS_TIME_FORMAT)),
        format!("RRULE:FREQ=DAILY;COUNT={DAYS_PER_CYCLE}"),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    Ok(out)
}

/// RFC 5545 TEXT escaping.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
