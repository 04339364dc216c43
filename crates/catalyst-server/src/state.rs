use catalyst_coach::CoachingProvider;
use catalyst_core::config::Config;
use catalyst_core::repository::CycleRepository;
use catalyst_core::store::CycleStore;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::sync::DebouncedSaver;

/// Published on [`AppState::event_tx`] after every commit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Commits seen by this server process, starting at 1.
    pub revision: u64,
    pub cycle_id: String,
    pub streak: u32,
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub store: Arc<CycleStore>,
    pub coach: Arc<dyn CoachingProvider>,
    pub event_tx: broadcast::Sender<ChangeEvent>,
    /// `None` outside a Tokio runtime (sync unit tests).
    pub saver: Option<Arc<DebouncedSaver>>,
}

impl AppState {
    /// Wire the store to the event stream and, inside a runtime, to the
    /// debounced writer.
    pub fn new(
        root: PathBuf,
        config: Config,
        store: CycleStore,
        repo: Arc<dyn CycleRepository>,
        coach: Arc<dyn CoachingProvider>,
    ) -> Self {
        let (tx, _) = broadcast::channel(64);

        let saver = if tokio::runtime::Handle::try_current().is_ok() {
            let quiet = Duration::from_millis(config.sync.debounce_ms);
            let user_key = config.storage.user_key().to_string();
            Some(Arc::new(DebouncedSaver::spawn(repo, user_key, quiet)))
        } else {
            None
        };

        let events = tx.clone();
        let listener_saver = saver.clone();
        let revision = AtomicU64::new(0);
        store.on_change(move |cycle| {
            let _ = events.send(ChangeEvent {
                revision: revision.fetch_add(1, Ordering::SeqCst) + 1,
                cycle_id: cycle.id.clone(),
                streak: cycle.streak,
            });
            if let Some(saver) = &listener_saver {
                saver.notify(cycle);
            }
        });

        Self {
            root,
            config: Arc::new(config),
            store: Arc::new(store),
            coach,
            event_tx: tx,
            saver,
        }
    }

    /// Flush pending persistence; called once on graceful shutdown.
    pub async fn flush(&self) {
        if let Some(saver) = &self.saver {
            saver.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_coach::MockProvider;
    use catalyst_core::cycle::Cycle;
    use catalyst_core::repository::MemoryRepository;

    fn state() -> AppState {
        AppState::new(
            PathBuf::from("/tmp/test"),
            Config::default(),
            CycleStore::new(Some(Cycle::new())),
            Arc::new(MemoryRepository::new()),
            Arc::new(MockProvider::new("ok")),
        )
    }

    #[test]
    fn no_saver_outside_runtime() {
        let state = state();
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
        assert!(state.saver.is_none());
    }

    #[tokio::test]
    async fn commits_broadcast_events() {
        let state = state();
        let mut rx = state.event_tx.subscribe();
        state.store.apply(|c| Ok(c.set_vision("v"))).unwrap();
        state.store.apply(|c| Ok(c.set_vision("w"))).unwrap();
        assert_eq!(rx.try_recv().unwrap().revision, 1);
        assert_eq!(rx.try_recv().unwrap().revision, 2);
        assert!(state.saver.is_some());
    }
}
