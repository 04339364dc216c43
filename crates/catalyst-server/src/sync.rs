//! Debounced persistence of the committed cycle.
//!
//! Every committed snapshot is published on a `watch` channel. A background
//! task waits for a quiet period after the latest change and writes only
//! that snapshot, so a burst of edits costs one save. Save failures are
//! logged and never reach the edit that caused them.

use catalyst_core::cycle::Cycle;
use catalyst_core::repository::CycleRepository;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

pub struct DebouncedSaver {
    tx: watch::Sender<Option<Cycle>>,
    shutdown: Arc<Notify>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedSaver {
    /// Start the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(repo: Arc<dyn CycleRepository>, user_key: String, quiet: Duration) -> Self {
        let (tx, rx) = watch::channel(None);
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(run(rx, shutdown.clone(), repo, user_key, quiet));
        Self {
            tx,
            shutdown,
            task: Mutex::new(Some(task)),
        }
    }

    /// Schedule `cycle` for saving, replacing any pending snapshot.
    pub fn notify(&self, cycle: &Cycle) {
        self.tx.send_replace(Some(cycle.clone()));
    }

    /// Write any pending snapshot now and stop the task.
    pub async fn shutdown(&self) {
        self.shutdown.notify_one();
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "persistence task failed");
            }
        }
    }
}

async fn run(
    mut rx: watch::Receiver<Option<Cycle>>,
    shutdown: Arc<Notify>,
    repo: Arc<dyn CycleRepository>,
    user_key: String,
    quiet: Duration,
) {
    loop {
        let closing = tokio::select! {
            changed = rx.changed() => changed.is_err(),
            _ = shutdown.notified() => true,
        };
        if closing {
            break;
        }

        // Trailing edge: each newer change restarts the quiet period.
        let closing = loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break true;
                    }
                }
                _ = tokio::time::sleep(quiet) => break false,
                _ = shutdown.notified() => break true,
            }
        };
        save_latest(&mut rx, &repo, &user_key).await;
        if closing {
            return;
        }
    }

    if rx.has_changed().unwrap_or(false) {
        save_latest(&mut rx, &repo, &user_key).await;
    }
}

async fn save_latest(
    rx: &mut watch::Receiver<Option<Cycle>>,
    repo: &Arc<dyn CycleRepository>,
    user_key: &str,
) {
    let Some(cycle) = rx.borrow_and_update().clone() else {
        return;
    };
    let repo = repo.clone();
    let key = user_key.to_string();
    let result = tokio::task::spawn_blocking(move || repo.save(&key, &cycle)).await;
    match result {
        Ok(Ok(())) => tracing::debug!(user = user_key, "cycle saved"),
        Ok(Err(e)) => tracing::warn!(user = user_key, error = %e, "failed to save cycle"),
        Err(e) => tracing::warn!(user = user_key, error = %e, "save task panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_core::repository::MemoryRepository;

    fn saver(quiet_ms: u64) -> (DebouncedSaver, Arc<MemoryRepository>) {
        let repo = Arc::new(MemoryRepository::new());
        let saver = DebouncedSaver::spawn(repo.clone(), "u1".into(), Duration::from_millis(quiet_ms));
        (saver, repo)
    }

    #[tokio::test]
    async fn burst_of_changes_is_one_write() {
        let (saver, repo) = saver(50);
        let mut cycle = Cycle::new();
        for i in 0..10 {
            cycle.set_vision(format!("draft {i}"));
            saver.notify(&cycle);
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(repo.save_count(), 1);
        let saved = repo.load("u1").unwrap().unwrap();
        assert_eq!(saved.vision, "draft 9");
    }

    #[tokio::test]
    async fn separated_changes_are_separate_writes() {
        let (saver, repo) = saver(20);
        let mut cycle = Cycle::new();
        saver.notify(&cycle);
        tokio::time::sleep(Duration::from_millis(300)).await;
        cycle.set_vision("second");
        saver.notify(&cycle);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn shutdown_flushes_pending_snapshot() {
        let (saver, repo) = saver(60_000);
        let mut cycle = Cycle::new();
        cycle.set_vision("keep me");
        saver.notify(&cycle);
        saver.shutdown().await;

        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.load("u1").unwrap().unwrap().vision, "keep me");
    }

    #[tokio::test]
    async fn shutdown_without_changes_writes_nothing() {
        let (saver, repo) = saver(10);
        saver.shutdown().await;
        assert_eq!(repo.save_count(), 0);
    }
}
