use axum::extract::{Path, State};
use axum::Json;
use catalyst_core::cycle::{Cycle, GoalPatch, TacticDraft, TacticPatch, MAX_GOALS};
use chrono::Utc;
use serde::Deserialize;

use super::commit;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NewGoalBody {
    pub title: String,
}

/// POST /api/goals — a fourth goal is not applied; the cycle is returned
/// unchanged with `applied: false`.
pub async fn add_goal(
    State(app): State<AppState>,
    Json(body): Json<NewGoalBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (id, cycle) = commit(&app, |c| Ok(c.add_goal(body.title)))?;
    if id.is_none() {
        tracing::info!(max = MAX_GOALS, "goal not applied: cycle is full");
    }
    Ok(Json(serde_json::json!({
        "applied": id.is_some(),
        "id": id,
        "cycle": cycle,
    })))
}

/// PATCH /api/goals/{id}
pub async fn update_goal(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<GoalPatch>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| c.update_goal(&id, patch))?;
    Ok(Json(cycle))
}

/// DELETE /api/goals/{id} — drops the goal's tactics and rescores every week.
pub async fn remove_goal(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| {
        c.remove_goal(&id)?;
        c.refresh_streak(Utc::now());
        Ok(())
    })?;
    Ok(Json(cycle))
}

/// POST /api/goals/{id}/tactics
pub async fn add_tactic(
    State(app): State<AppState>,
    Path(goal_id): Path<String>,
    Json(draft): Json<TacticDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (id, cycle) = commit(&app, |c| {
        let id = c.add_tactic(&goal_id, draft)?;
        c.refresh_streak(Utc::now());
        Ok(id)
    })?;
    Ok(Json(serde_json::json!({ "id": id, "cycle": cycle })))
}

/// PATCH /api/goals/{id}/tactics/{tactic}
pub async fn update_tactic(
    State(app): State<AppState>,
    Path((goal_id, tactic_id)): Path<(String, String)>,
    Json(patch): Json<TacticPatch>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| {
        c.update_tactic(&goal_id, &tactic_id, patch)?;
        c.refresh_streak(Utc::now());
        Ok(())
    })?;
    Ok(Json(cycle))
}

/// DELETE /api/goals/{id}/tactics/{tactic}
pub async fn remove_tactic(
    State(app): State<AppState>,
    Path((goal_id, tactic_id)): Path<(String, String)>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| {
        c.remove_tactic(&goal_id, &tactic_id)?;
        c.refresh_streak(Utc::now());
        Ok(())
    })?;
    Ok(Json(cycle))
}
