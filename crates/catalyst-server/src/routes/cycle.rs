use axum::extract::{Query, State};
use axum::Json;
use catalyst_core::accountability::MeetingBrief;
use catalyst_core::cycle::Cycle;
use catalyst_core::summary::CycleSummary;
use chrono::Utc;
use serde::Deserialize;

use super::{commit, snapshot};
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/cycle — the committed cycle document.
pub async fn get_cycle(State(app): State<AppState>) -> Result<Json<Cycle>, AppError> {
    Ok(Json(snapshot(&app)?))
}

/// GET /api/summary — dashboard numbers as of now.
pub async fn get_summary(State(app): State<AppState>) -> Result<Json<CycleSummary>, AppError> {
    let cycle = snapshot(&app)?;
    Ok(Json(CycleSummary::of(&cycle, Utc::now())))
}

#[derive(Deserialize)]
pub struct WamQuery {
    pub week: Option<u32>,
}

/// GET /api/wam — accountability meeting agenda; reviews last week unless
/// `?week=N` is given.
pub async fn get_wam(
    State(app): State<AppState>,
    Query(query): Query<WamQuery>,
) -> Result<Json<MeetingBrief>, AppError> {
    let cycle = snapshot(&app)?;
    let brief = match query.week {
        Some(week) => MeetingBrief::reviewing(&cycle, week)?,
        None => MeetingBrief::of(&cycle, Utc::now()),
    };
    Ok(Json(brief))
}

#[derive(Deserialize)]
pub struct VisionBody {
    pub vision: String,
}

/// PUT /api/vision
pub async fn put_vision(
    State(app): State<AppState>,
    Json(body): Json<VisionBody>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| {
        c.set_vision(body.vision);
        Ok(())
    })?;
    Ok(Json(cycle))
}

#[derive(Deserialize, Default)]
pub struct OnboardingBody {
    #[serde(default)]
    pub vision: Option<String>,
}

/// POST /api/onboarding/complete — optional final vision.
pub async fn complete_onboarding(
    State(app): State<AppState>,
    Json(body): Json<OnboardingBody>,
) -> Result<Json<Cycle>, AppError> {
    let ((), cycle) = commit(&app, |c| {
        c.complete_onboarding(body.vision);
        Ok(())
    })?;
    tracing::info!(id = %cycle.id, "onboarding completed");
    Ok(Json(cycle))
}
