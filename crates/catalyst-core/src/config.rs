use crate::error::Result;
use crate::paths;
use crate::types::BlockKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StorageBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON file under `.catalyst/`.
    #[default]
    Local,
    /// Per-user document at `{base_url}/{collection}/{user}`.
    Remote {
        base_url: String,
        #[serde(default = "default_collection")]
        collection: String,
        user: String,
        /// Environment variable holding a bearer token.
        #[serde(default)]
        token_env: Option<String>,
    },
}

fn default_collection() -> String {
    "user_cycles".to_string()
}

impl StorageBackend {
    /// Key the cycle is stored under.
    pub fn user_key(&self) -> &str {
        match self {
            StorageBackend::Local => paths::LOCAL_USER,
            StorageBackend::Remote { user, .. } => user,
        }
    }
}

// ---------------------------------------------------------------------------
// CoachBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoachBackend {
    OpenRouter {
        #[serde(default = "default_open_router_model")]
        model: String,
        #[serde(default = "default_open_router_url")]
        base_url: String,
        #[serde(default = "default_open_router_key_env")]
        api_key_env: String,
    },
    Gemini {
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default = "default_gemini_url")]
        base_url: String,
        #[serde(default = "default_gemini_key_env")]
        api_key_env: String,
    },
}

fn default_open_router_model() -> String {
    "arcee-ai/trinity-large-preview:free".to_string()
}

fn default_open_router_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_open_router_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for CoachBackend {
    fn default() -> Self {
        CoachBackend::OpenRouter {
            model: default_open_router_model(),
            base_url: default_open_router_url(),
            api_key_env: default_open_router_key_env(),
        }
    }
}

impl CoachBackend {
    pub fn gemini() -> Self {
        CoachBackend::Gemini {
            model: default_gemini_model(),
            base_url: default_gemini_url(),
            api_key_env: default_gemini_key_env(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoachBackend::OpenRouter { .. } => "open_router",
            CoachBackend::Gemini { .. } => "gemini",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            CoachBackend::OpenRouter { model, .. } | CoachBackend::Gemini { model, .. } => model,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            CoachBackend::OpenRouter { base_url, .. } | CoachBackend::Gemini { base_url, .. } => {
                base_url
            }
        }
    }

    pub fn api_key_env(&self) -> &str {
        match self {
            CoachBackend::OpenRouter { api_key_env, .. }
            | CoachBackend::Gemini { api_key_env, .. } => api_key_env,
        }
    }
}

// ---------------------------------------------------------------------------
// CoachConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub backend: CoachBackend,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            backend: CoachBackend::default(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

// ---------------------------------------------------------------------------
// SyncConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Quiet period after the last change before the cycle is written.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    1000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// CalendarConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// UTC hour at which exported blocks start.
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default)]
    pub block: BlockKind,
}

fn default_start_hour() -> u32 {
    9
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            block: BlockKind::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub coach: CoachConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            storage: StorageBackend::default(),
            coach: CoachConfig::default(),
            sync: SyncConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl Config {
    pub fn exists(root: &Path) -> bool {
        paths::config_path(root).exists()
    }

    /// Load `.catalyst/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Remote storage: URL scheme and user key
        if let StorageBackend::Remote { base_url, user, .. } = &self.storage {
            if let Some(msg) = url_problem(base_url) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("storage.base_url: {msg}"),
                });
            }
            if paths::validate_user_key(user).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("storage.user '{user}' is not a valid user key"),
                });
            }
        }

        // 2. Coach backend
        let backend = &self.coach.backend;
        if backend.model().trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("coach backend '{}' has an empty model", backend.kind()),
            });
        }
        if let Some(msg) = url_problem(backend.base_url()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("coach.backend.base_url: {msg}"),
            });
        }
        if std::env::var(backend.api_key_env()).map_or(true, |v| v.is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "{} is not set; coaching requests will fail",
                    backend.api_key_env()
                ),
            });
        }

        // 3. Timeouts and temperature
        if self.coach.timeout_secs == 0 || self.coach.timeout_secs > 600 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "coach.timeout_secs={} (expected 1-600)",
                    self.coach.timeout_secs
                ),
            });
        }
        if !(0.0..=2.0).contains(&self.coach.temperature) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "coach.temperature={} is outside 0.0-2.0",
                    self.coach.temperature
                ),
            });
        }

        // 4. Sync
        if self.sync.debounce_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "sync.debounce_ms=0 writes on every change".to_string(),
            });
        }

        // 5. Calendar
        if self.calendar.start_hour > 23 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "calendar.start_hour={} (expected 0-23)",
                    self.calendar.start_hour
                ),
            });
        }

        warnings
    }
}

/// HTTPS everywhere; plain HTTP only for loopback hosts.
fn url_problem(url: &str) -> Option<String> {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return Some(format!("'{url}' is not a valid URL"));
    };
    let host = parsed.host_str().unwrap_or("");
    match parsed.scheme() {
        "https" => None,
        "http" if matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1") => None,
        "http" => Some(format!("'{url}' must use https for non-local hosts")),
        other => Some(format!("unsupported scheme '{other}' in '{url}'")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
