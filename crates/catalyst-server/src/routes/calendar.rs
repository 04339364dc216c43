use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use catalyst_core::calendar::{self, BlockSchedule};
use catalyst_core::types::BlockKind;
use chrono::Utc;
use serde::Deserialize;

use super::snapshot;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub kind: Option<String>,
    pub hour: Option<u32>,
}

/// GET /api/calendar.ics?kind=&hour= — recurring daily block as an
/// iCalendar download. Defaults come from the `calendar` config section.
pub async fn download(
    State(app): State<AppState>,
    Query(q): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind = match q.kind.as_deref() {
        Some(k) => k.parse::<BlockKind>()?,
        None => app.config.calendar.block,
    };
    let schedule = BlockSchedule {
        kind,
        start_hour: q.hour.unwrap_or(app.config.calendar.start_hour),
    };
    let cycle = snapshot(&app)?;
    let ics = calendar::export_ics(&cycle, schedule, Utc::now())?;
    let disposition = format!("attachment; filename=\"{}\"", calendar::file_name(kind));
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    ))
}
