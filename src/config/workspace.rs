use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sigils::Sigils;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to read workspace file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse workspace file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persisted user preferences consumed by the processing core: delimiter
/// configuration, the bootstrap script, and the scripting working
/// directory.
///
/// Changing the sigils requires rebuilding every codec and map derived
/// from the old pair; the values here are plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    /// Document variable delimiters.
    pub sigils: Sigils,
    /// Delimiters wrapped around generated script expressions.
    pub script_sigils: Sigils,
    /// Script evaluated once before any inline expression, with the
    /// resolved definitions bound in.
    pub bootstrap_script: String,
    /// Directory bound into the scripting scope for relative paths.
    pub working_directory: PathBuf,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            sigils: Sigils::default(),
            script_sigils: Sigils::new("", ""),
            bootstrap_script: String::new(),
            working_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Workspace {
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), WorkspaceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Configuration directory, `~/.config/wren/` by convention.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("wren"))
    }

    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("workspace.json"))
    }

    /// Load the default workspace file if it exists; defaults otherwise.
    pub fn load_default() -> Self {
        if let Some(config_file) = Self::config_file()
            && config_file.exists()
            && let Ok(workspace) = Self::load(&config_file)
        {
            return workspace;
        }

        Self::default()
    }
}
