pub mod error;
pub mod routes;
pub mod state;
pub mod sync;

use axum::routing::{get, patch, post, put};
use axum::Router;
use catalyst_core::config::Config;
use catalyst_core::repository::{self, CycleRepository};
use catalyst_core::store::CycleStore;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Cycle
        .route("/api/cycle", get(routes::cycle::get_cycle))
        .route("/api/summary", get(routes::cycle::get_summary))
        .route("/api/wam", get(routes::cycle::get_wam))
        .route("/api/vision", put(routes::cycle::put_vision))
        .route(
            "/api/onboarding/complete",
            post(routes::cycle::complete_onboarding),
        )
        // Goals
        .route("/api/goals", post(routes::goals::add_goal))
        .route(
            "/api/goals/{id}",
            patch(routes::goals::update_goal).delete(routes::goals::remove_goal),
        )
        // Tactics
        .route("/api/goals/{id}/tactics", post(routes::goals::add_tactic))
        .route(
            "/api/goals/{id}/tactics/{tactic}",
            patch(routes::goals::update_tactic).delete(routes::goals::remove_tactic),
        )
        .route(
            "/api/goals/{id}/suggest-tactics",
            post(routes::coach::suggest_tactics),
        )
        // Weekly execution
        .route(
            "/api/weeks/{n}/toggle/{tactic}",
            post(routes::weeks::toggle_completion),
        )
        .route(
            "/api/weeks/{n}/reflections",
            put(routes::weeks::put_reflections),
        )
        // Calendar
        .route("/api/calendar.ics", get(routes::calendar::download))
        // Coaching
        .route("/api/coach/feedback", post(routes::coach::feedback))
        .route("/api/coach/recovery/{n}", post(routes::coach::recovery))
        .route(
            "/api/coach/vision-prompts",
            get(routes::coach::vision_prompts),
        )
        .route(
            "/api/coach/refine-vision",
            post(routes::coach::refine_vision),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Open the configured repository, load (or create) the user's cycle and
/// wire up the coach, store and persistence task.
pub async fn load_state(root: PathBuf, config: Config) -> anyhow::Result<AppState> {
    let storage = config.storage.clone();
    let repo_root = root.clone();
    let (repo, cycle) = tokio::task::spawn_blocking(move || {
        let repo: Arc<dyn CycleRepository> = Arc::from(repository::open(&repo_root, &storage)?);
        let (cycle, _) = repository::load_or_init(repo.as_ref(), storage.user_key())?;
        Ok::<_, catalyst_core::CatalystError>((repo, cycle))
    })
    .await
    .map_err(|e| anyhow::anyhow!("task join error: {e}"))??;

    tracing::info!(id = %cycle.id, store = %repo.describe(), "cycle loaded");
    let coach = catalyst_coach::from_config(&config.coach)?;
    Ok(AppState::new(
        root,
        config,
        CycleStore::new(Some(cycle)),
        repo,
        coach,
    ))
}

/// Serve the API on a pre-bound listener until the server stops.
///
/// The caller owns shutdown: race this against a signal, then call
/// [`AppState::flush`] so the last edits are written.
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("Catalyst server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/summary");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
