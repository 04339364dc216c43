use axum::extract::{Path, State};
use axum::Json;
use catalyst_core::cycle::Cycle;
use catalyst_core::score::ScoreBand;
use chrono::Utc;
use serde::Deserialize;

use super::commit;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/weeks/{n}/toggle/{tactic} — advance the completion count
/// (wrapping to 0 after the target) and rescore the week.
pub async fn toggle_completion(
    State(app): State<AppState>,
    Path((week, tactic_id)): Path<(u32, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (count, cycle) = commit(&app, |c| {
        let count = c.toggle_completion(week, &tactic_id)?;
        c.refresh_streak(Utc::now());
        Ok(count)
    })?;
    let score = cycle.week(week)?.score;
    Ok(Json(serde_json::json!({
        "week": week,
        "tacticId": tactic_id,
        "count": count,
        "score": score,
        "band": ScoreBand::of(score),
        "cycle": cycle,
    })))
}

#[derive(Deserialize)]
pub struct ReflectionsBody {
    pub reflections: String,
}

/// PUT /api/weeks/{n}/reflections
pub async fn put_reflections(
    State(app): State<AppState>,
    Path(week): Path<u32>,
    Json(body): Json<ReflectionsBody>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| c.set_reflections(week, body.reflections))?;
    Ok(Json(cycle))
}
