//! # Configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`--config maturogram.toml`), then command-line flags.
//!
//! ```toml
//! database = "maturogram.db"
//! backend = "redb"          # or "memory"
//! age_policy = "strict"     # or "legacy"
//! undo_depth = 20
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```
//!
//! Security knobs for the HTTP server stay in the environment:
//! `MATUROGRAM_CORS_ORIGINS`, `MATUROGRAM_RATE_LIMIT`, `MATUROGRAM_ADMIN_KEY`.

use maturogram_core::primitives::DEFAULT_UNDO_DEPTH;
use maturogram_core::{AgePolicy, Archive, MaturityScorer, MaturogramError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Maximum config file size (64 KiB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// BACKEND
// =============================================================================

/// Where records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// redb database file (persistent).
    #[default]
    Redb,
    /// Process memory (lost on exit).
    Memory,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Redb => "redb",
            Backend::Memory => "memory",
        }
    }
}

impl FromStr for Backend {
    type Err = MaturogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redb" => Ok(Backend::Redb),
            "memory" | "mem" => Ok(Backend::Memory),
            other => Err(MaturogramError::InvalidInput(format!(
                "Unknown backend: {}. Use: redb, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// CONFIG FILE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: PathBuf,
    pub backend: Backend,
    pub age_policy: AgePolicy,
    pub undo_depth: usize,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("maturogram.db"),
            backend: Backend::default(),
            age_policy: AgePolicy::default(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, MaturogramError> {
        toml::from_str(text).map_err(|e| {
            MaturogramError::DeserializationError(format!("failed to parse config: {}", e))
        })
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, MaturogramError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            MaturogramError::IoError(format!("failed to read {}: {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(MaturogramError::InvalidInput(format!(
                "config file {} exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            MaturogramError::IoError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Read settings from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, MaturogramError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// The scorer these settings describe.
    pub fn scorer(&self) -> MaturityScorer {
        MaturityScorer::with_policy(self.age_policy)
    }

    /// Open the archive on the configured backend.
    pub fn open_archive(&self) -> Result<Archive, MaturogramError> {
        match self.backend {
            Backend::Redb => Archive::open_redb(&self.database, self.scorer(), self.undo_depth),
            Backend::Memory => Ok(Archive::in_memory(self.scorer(), self.undo_depth)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
