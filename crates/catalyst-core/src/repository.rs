use crate::config::StorageBackend;
use crate::cycle::Cycle;
use crate::error::Result;
use crate::paths;
use crate::remote::RemoteRepository;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// CycleRepository
// ---------------------------------------------------------------------------

/// Load/save of the one cycle document that belongs to a user.
///
/// `load` returning `Ok(None)` means "no cycle yet", which callers answer by
/// initializing a fresh one. `save` is an upsert; the last write wins.
pub trait CycleRepository: Send + Sync {
    fn load(&self, user_key: &str) -> Result<Option<Cycle>>;
    fn save(&self, user_key: &str, cycle: &Cycle) -> Result<()>;
    /// Short human-readable location, used in log lines.
    fn describe(&self) -> String;
}

/// Build the repository selected by config.
pub fn open(root: &Path, storage: &StorageBackend) -> Result<Box<dyn CycleRepository>> {
    match storage {
        StorageBackend::Local => Ok(Box::new(LocalRepository::new(root))),
        StorageBackend::Remote {
            base_url,
            collection,
            user,
            token_env,
        } => {
            paths::validate_user_key(user)?;
            let token = token_env
                .as_deref()
                .and_then(|name| std::env::var(name).ok())
                .filter(|t| !t.is_empty());
            Ok(Box::new(RemoteRepository::new(base_url, collection, token)))
        }
    }
}

/// Load the user's cycle, or create, persist and return a fresh one.
/// The flag is `true` when the cycle was just created.
pub fn load_or_init(repo: &dyn CycleRepository, user_key: &str) -> Result<(Cycle, bool)> {
    if let Some(cycle) = repo.load(user_key)? {
        return Ok((cycle, false));
    }
    let cycle = Cycle::new();
    repo.save(user_key, &cycle)?;
    tracing::info!(id = %cycle.id, store = %repo.describe(), "initialized new cycle");
    Ok((cycle, true))
}

// ---------------------------------------------------------------------------
// LocalRepository
// ---------------------------------------------------------------------------

/// On-device JSON file. Single implicit user, so the key is ignored.
pub struct LocalRepository {
    path: PathBuf,
}

impl LocalRepository {
    pub fn new(root: &Path) -> Self {
        Self {
            path: paths::cycle_path(root),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CycleRepository for LocalRepository {
    fn load(&self, _user_key: &str) -> Result<Option<Cycle>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&self.path)?;
        let cycle: Cycle = serde_json::from_str(&data)?;
        Ok(Some(cycle.repair()?))
    }

    fn save(&self, _user_key: &str, cycle: &Cycle) -> Result<()> {
        let data = serde_json::to_string_pretty(cycle)?;
        crate::io::atomic_write(&self.path, data.as_bytes())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// MemoryRepository
// ---------------------------------------------------------------------------

/// Process-local repository for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryRepository {
    docs: Mutex<HashMap<String, Cycle>>,
    saves: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CycleRepository for MemoryRepository {
    fn load(&self, user_key: &str) -> Result<Option<Cycle>> {
        let docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(docs.get(user_key).cloned())
    }

    fn save(&self, user_key: &str, cycle: &Cycle) -> Result<()> {
        let mut docs = self.docs.lock().unwrap_or_else(|e| e.into_inner());
        docs.insert(user_key.to_string(), cycle.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
