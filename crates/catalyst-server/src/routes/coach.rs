use axum::extract::{Path, State};
use axum::Json;
use catalyst_core::score;
use chrono::Utc;
use serde::Deserialize;

use super::{commit, snapshot};
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/coach/feedback — critique of the current vision and goals.
pub async fn feedback(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cycle = snapshot(&app)?;
    let text = app.coach.get_feedback(&cycle.vision, &cycle.goals).await?;
    Ok(Json(serde_json::json!({ "feedback": text })))
}

/// POST /api/coach/recovery/{n} — corrective plan for a week below 85%.
pub async fn recovery(
    State(app): State<AppState>,
    Path(week): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cycle = snapshot(&app)?;
    let week_score = cycle.week(week)?.score;
    let plan = app.coach.get_corrective_action(&cycle, week).await?;
    Ok(Json(serde_json::json!({
        "week": week,
        "score": week_score,
        "recoverable": score::is_recoverable(week_score),
        "plan": plan,
    })))
}

/// GET /api/coach/vision-prompts — always five prompts.
pub async fn vision_prompts(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let prompts = app.coach.generate_vision_prompts().await;
    Ok(Json(serde_json::json!({
        "fallback": prompts.is_fallback(),
        "prompts": prompts.into_inner(),
    })))
}

#[derive(Deserialize, Default)]
pub struct RefineBody {
    /// Defaults to the cycle's current vision.
    #[serde(default)]
    pub draft: Option<String>,
    /// Store the refined text as the cycle's vision.
    #[serde(default)]
    pub apply: bool,
}

/// POST /api/coach/refine-vision
pub async fn refine_vision(
    State(app): State<AppState>,
    Json(body): Json<RefineBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = match body.draft {
        Some(d) => d,
        None => snapshot(&app)?.vision,
    };
    if draft.trim().is_empty() {
        return Err(AppError::bad_request("nothing to refine: vision is empty"));
    }
    let refined = app.coach.refine_vision(&draft).await?;
    if body.apply {
        let text = refined.clone();
        commit(&app, |c| {
            c.set_vision(text);
            Ok(())
        })?;
    }
    Ok(Json(serde_json::json!({
        "vision": refined,
        "applied": body.apply,
    })))
}

/// POST /api/goals/{id}/suggest-tactics — ask the coach for tactics and
/// append them to the goal.
pub async fn suggest_tactics(
    State(app): State<AppState>,
    Path(goal_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let title = snapshot(&app)?.goal(&goal_id)?.title.clone();
    let suggestions = app.coach.suggest_tactics(&title).await;
    let fallback = suggestions.is_fallback();

    // The goal may have been removed while the coach was thinking.
    let (added, cycle) = commit(&app, |c| {
        let added = c.merge_suggested_tactics(&goal_id, suggestions.into_inner())?;
        c.refresh_streak(Utc::now());
        Ok(added)
    })?;
    tracing::info!(goal = %goal_id, added = added.len(), fallback, "merged suggested tactics");
    Ok(Json(serde_json::json!({
        "added": added,
        "fallback": fallback,
        "cycle": cycle,
    })))
}
