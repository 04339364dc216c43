use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::state::{AppState, ChangeEvent};

/// GET /api/events — `update` after every committed change. A subscriber
/// that falls behind gets one `resync` instead of the missed updates and
/// should refetch `/api/cycle`.
pub async fn sse_events(State(app): State<AppState>) -> impl IntoResponse {
    let rx = app.event_tx.subscribe();
    let stream = BroadcastStream::new(rx).map(|msg| {
        let event = match msg {
            Ok(change) => update_event(&change),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => Event::default()
                .event("resync")
                .data(skipped.to_string()),
        };
        Ok::<Event, Infallible>(event)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn update_event(change: &ChangeEvent) -> Event {
    let data = serde_json::to_string(change).unwrap_or_default();
    Event::default()
        .event("update")
        .id(change.revision.to_string())
        .data(data)
}
