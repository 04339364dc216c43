//! Single-writer container for the cycle document.
//!
//! Every mutation goes through [`CycleStore::update`] (or one of its
//! conveniences): the transformation receives the latest committed cycle and
//! its output replaces it whole. Readers get a full snapshot or nothing.
//! Listeners registered with [`CycleStore::on_change`] see every committed
//! snapshot, in commit order.

use crate::cycle::Cycle;
use crate::error::{CatalystError, Result};
use std::sync::{Mutex, MutexGuard, RwLock};

type Listener = Box<dyn Fn(&Cycle) + Send + Sync>;

pub struct CycleStore {
    current: Mutex<Option<Cycle>>,
    listeners: RwLock<Vec<Listener>>,
}

impl CycleStore {
    pub fn new(initial: Option<Cycle>) -> Self {
        Self {
            current: Mutex::new(initial),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Snapshot of the committed cycle.
    pub fn get(&self) -> Option<Cycle> {
        self.lock().clone()
    }

    /// Register a change listener.
    ///
    /// Listeners run on the committing thread while the store is held, so
    /// they must be quick and must not call back into the store.
    pub fn on_change(&self, listener: impl Fn(&Cycle) + Send + Sync + 'static) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(listener));
    }

    /// Commit `cycle` unconditionally (first-run initialization).
    pub fn replace(&self, cycle: Cycle) {
        let mut guard = self.lock();
        self.notify(&cycle);
        *guard = Some(cycle);
    }

    /// Apply a pure transformation to the committed cycle.
    ///
    /// Declines (returns `None`) when there is no cycle yet. A transformation
    /// that returns an identical document commits nothing and notifies no
    /// one.
    pub fn update<F>(&self, transform: F) -> Option<Cycle>
    where
        F: FnOnce(&Cycle) -> Cycle,
    {
        let mut guard = self.lock();
        let prev = guard.as_ref()?;
        let next = transform(prev);
        if &next != prev {
            self.notify(&next);
            *guard = Some(next.clone());
        }
        Some(next)
    }

    /// Run a fallible edit against a copy of the committed cycle and commit
    /// it only if the edit succeeds. Fails with [`CatalystError::NoCycle`]
    /// when nothing has been initialized.
    pub fn apply<T, F>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Cycle) -> Result<T>,
    {
        let mut guard = self.lock();
        let prev = guard.as_ref().ok_or(CatalystError::NoCycle)?;
        let mut next = prev.clone();
        let out = edit(&mut next)?;
        if &next != prev {
            self.notify(&next);
            *guard = Some(next);
        }
        Ok(out)
    }

    fn notify(&self, cycle: &Cycle) {
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        for listener in listeners.iter() {
            listener(cycle);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Cycle>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CycleStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::TacticDraft;
    use crate::types::Frequency;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_store(initial: Option<Cycle>) -> (CycleStore, Arc<AtomicUsize>) {
        let store = CycleStore::new(initial);
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        store.on_change(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        (store, hits)
    }

    #[test]
    fn update_declines_when_absent() {
        let (store, hits) = counting_store(None);
        let out = store.update(|c| {
            let mut next = c.clone();
            next.set_vision("never");
            next
        });
        assert!(out.is_none());
        assert!(store.get().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn apply_without_cycle_is_no_cycle_error() {
        let store = CycleStore::empty();
        let err = store.apply(|c| Ok(c.add_goal("x"))).unwrap_err();
        assert!(matches!(err, CatalystError::NoCycle));
    }

    #[test]
    fn updates_compose_in_order() {
        let (store, hits) = counting_store(Some(Cycle::new()));
        store.update(|c| {
            let mut next = c.clone();
            next.set_vision("first");
            next
        });
        store.update(|c| {
            let mut next = c.clone();
            next.set_vision(format!("{} then second", c.vision));
            next
        });
        assert_eq!(store.get().unwrap().vision, "first then second");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_edit_leaves_document_untouched() {
        let (store, hits) = counting_store(Some(Cycle::new()));
        let before = store.get().unwrap();
        let result = store.apply(|c| {
            c.set_vision("half-applied");
            c.toggle_completion(1, "missing-tactic")
        });
        assert!(result.is_err());
        assert_eq!(store.get().unwrap(), before);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejected_fourth_goal_does_not_notify() {
        let (store, hits) = counting_store(Some(Cycle::new()));
        for title in ["a", "b", "c"] {
            assert!(store.apply(|c| Ok(c.add_goal(title))).unwrap().is_some());
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(store.apply(|c| Ok(c.add_goal("d"))).unwrap().is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(store.get().unwrap().goals.len(), 3);
    }

    #[test]
    fn listeners_observe_committed_toggle() {
        let store = CycleStore::new(Some(Cycle::new()));
        let goal = store.apply(|c| Ok(c.add_goal("g"))).unwrap().unwrap();
        let tactic = store
            .apply(|c| c.add_tactic(&goal, TacticDraft::new("t", Frequency::Daily, 2)))
            .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        store.on_change(move |c| {
            s.lock().unwrap().push(c.executions[0].score);
        });
        store.apply(|c| c.toggle_completion(1, &tactic)).unwrap();
        store.apply(|c| c.toggle_completion(1, &tactic)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![50, 100]);
    }
}
