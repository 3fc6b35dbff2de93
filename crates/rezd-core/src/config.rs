use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_listen_port() -> u16 {
    8080
}

fn default_max_in_flight() -> usize {
    20
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_base_url() -> String {
    "https://assetdelivery.roblox.com/v1/asset/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

/// Remote delivery endpoint settings (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Base URL of the asset delivery endpoint. The asset id is appended as
    /// an `id` query parameter (percent-encoded).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent header sent on every retrieval.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional `Cookie` header value carrying the session credential,
    /// e.g. `.ROBLOSECURITY=<token>`. Treated as opaque; never logged.
    #[serde(default)]
    pub cookie: Option<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            cookie: None,
        }
    }
}

/// Global configuration loaded from `~/.config/rezd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RezdConfig {
    /// Port the HTTP server binds on all interfaces.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Maximum concurrent in-flight fetches per batch.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    /// Whole-retrieval timeout per asset, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Optional wall-clock deadline for a whole batch, in seconds. When set,
    /// fetches still pending at the deadline are abandoned and the partial
    /// map is returned. Absent by default (a batch runs until every fetch
    /// completes or times out individually).
    #[serde(default)]
    pub batch_deadline_secs: Option<u64>,
    /// Remote delivery endpoint settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl Default for RezdConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            max_in_flight: default_max_in_flight(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            batch_deadline_secs: None,
            delivery: DeliveryConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rezd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RezdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RezdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RezdConfig = toml::from_str(&data)?;
    Ok(cfg)
}
