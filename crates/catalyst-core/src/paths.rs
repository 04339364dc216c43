use crate::error::{CatalystError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CATALYST_DIR: &str = ".catalyst";
pub const CONFIG_FILE: &str = ".catalyst/config.yaml";
pub const CYCLE_FILE: &str = ".catalyst/cycle.json";

/// Key used by the local repository, which serves a single implicit user.
pub const LOCAL_USER: &str = "local";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn catalyst_dir(root: &Path) -> PathBuf {
    root.join(CATALYST_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn cycle_path(root: &Path) -> PathBuf {
    root.join(CYCLE_FILE)
}

/// Fallback root when nothing else is configured: the user's home directory.
pub fn default_root() -> Result<PathBuf> {
    home::home_dir().ok_or(CatalystError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// User key validation
// ---------------------------------------------------------------------------

static USER_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn user_key_re() -> &'static Regex {
    USER_KEY_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]{1,128}$").unwrap())
}

/// User keys become a path segment of the remote document URL.
pub fn validate_user_key(key: &str) -> Result<()> {
    if !user_key_re().is_match(key) {
        return Err(CatalystError::InvalidUserKey(key.to_string()));
    }
    Ok(())
}
