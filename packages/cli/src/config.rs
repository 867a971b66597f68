use pagesmith_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

/// Pagesmith configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// History tuning for editor sessions
    #[serde(default)]
    pub editor: EditorConfig,

    /// Category given to documents created without one
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_category() -> String {
    "general".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }

    /// Editor settings with command-line overrides applied
    pub fn editor_config(&self, max_history: Option<usize>, debounce_ms: Option<u64>) -> EditorConfig {
        let mut editor = self.editor.clone();
        if let Some(max_history) = max_history {
            editor.max_history = max_history;
        }
        if let Some(debounce_ms) = debounce_ms {
            editor.debounce_ms = debounce_ms;
        }
        editor.with_defaults()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            default_category: default_category(),
        }
    }
}
