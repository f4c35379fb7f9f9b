use crate::error::Result;
use crate::error_ext::ResultExt;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Number of sent messages kept for history browsing
pub const HISTORY_LIMIT: usize = 100;

const CONFIG_DIR: &str = ".claws";
const GLOBAL_CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "config.local.toml";

/// Central configuration for claws
#[derive(Debug, Clone, PartialEq)]
pub struct ClawsConfig {
    /// Endpoint connected at startup
    pub url: Option<String>,
    /// Server messages the reader may have queued for display before it waits
    pub pump_backlog: usize,
    /// How often the UI checks whether the connection went away
    pub reap_interval_ms: u64,
}

impl Default for ClawsConfig {
    fn default() -> Self {
        Self {
            url: None,
            pump_backlog: 64,
            reap_interval_ms: 250,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    url: Option<String>,
    pump_backlog: Option<usize>,
    reap_interval_ms: Option<u64>,
}

impl ClawsConfig {
    /// Load `~/.claws/config.toml`, then let `.claws/config.local.toml` override it
    pub fn load(workspace: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = std::env::var_os("HOME") {
            let global = PathBuf::from(home).join(CONFIG_DIR).join(GLOBAL_CONFIG_FILE);
            config.merge_file(&global)?;
        }

        config.merge_file(&workspace.join(CONFIG_DIR).join(LOCAL_CONFIG_FILE))?;
        config.validate()?;

        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());

        if file.url.is_some() {
            self.url = file.url;
        }
        if let Some(backlog) = file.pump_backlog {
            self.pump_backlog = backlog;
        }
        if let Some(interval) = file.reap_interval_ms {
            self.reap_interval_ms = interval;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.pump_backlog == 0 {
            return Err(crate::error::ClawsError::Config(
                "pump_backlog must be at least 1".to_string(),
            ));
        }
        if self.reap_interval_ms == 0 {
            return Err(crate::error::ClawsError::Config(
                "reap_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
