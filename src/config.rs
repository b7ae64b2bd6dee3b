use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV: &str = "SESMT_DASHBOARD_CONFIG";

/// Looked up in the working directory when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "sesmt-dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Immutable presentation settings.  Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub subtitle: String,
    /// Length of the event rankings.
    pub top_n: usize,
    pub window_size: [f32; 2],
    pub theme: ThemeConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "BI SESMT - Rezende Energia".to_string(),
            subtitle: "Acompanhamento de Ações de Segurança do Trabalho".to_string(),
            top_n: 10,
            window_size: [1280.0, 860.0],
            theme: ThemeConfig::default(),
        }
    }
}

/// Hex colours (`#RRGGBB`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#000000".to_string(),
            secondary: "#F7931E".to_string(),
            background: "#FFFFFF".to_string(),
            text: "#333333".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing dashboard config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Resolve the config: `$SESMT_DASHBOARD_CONFIG`, then
/// `./sesmt-dashboard.json`, then built-in defaults.
pub fn load_config() -> Result<DashboardConfig> {
    match config_path(std::env::var_os(CONFIG_ENV).map(PathBuf::from)) {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            DashboardConfig::from_file(&path)
        }
        None => Ok(DashboardConfig::default()),
    }
}

fn config_path(from_env: Option<PathBuf>) -> Option<PathBuf> {
    from_env.or_else(|| {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    })
}
