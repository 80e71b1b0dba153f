//! Configuration for the retrieval pipeline.
//!
//! Layered configuration in the order:
//! - Default values
//! - TOML configuration file (`.ragline/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `RAGLINE_` and use double
//! underscores to separate nested levels:
//! - `RAGLINE_CHUNKING__CHUNK_SIZE=400` sets `chunking.chunk_size`
//! - `RAGLINE_RETRIEVAL__TOP_K=3` sets `retrieval.top_k`
//! - `RAGLINE_API_KEY=sk-...` sets `api_key`
//!
//! The credential also falls back to `OPENAI_API_KEY` so existing shell
//! setups keep working.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{RagError, Result};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding the persisted vector index
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// API credential for the embedding and chat providers.
    /// Never written back to disk; normally supplied via environment.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Chunking parameters
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retrieval parameters
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chat model settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters controlling how documents are split before embedding.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between adjacent chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmbeddingConfig {
    /// Embedding model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    /// Generative model identifier
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Sampling temperature (0.0 keeps answers grounded)
    #[serde(default)]
    pub temperature: f32,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

/// Logging configuration consumed by [`crate::logging`].
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_index_path() -> PathBuf {
    PathBuf::from(".ragline/index")
}
fn default_chunk_size() -> usize {
    800
}
fn default_chunk_overlap() -> usize {
    120
}
fn default_top_k() -> usize {
    5
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            index_path: default_index_path(),
            api_key: None,
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            api_base: default_api_base(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            temperature: 0.0,
            api_base: default_api_base(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl ChunkingConfig {
    /// Validate the chunking invariants: `chunk_size > 0` and
    /// `chunk_overlap < chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Settings {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".ragline/settings.toml"));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, layering env overrides on top.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let mut settings: Settings = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path))
            // Layer in environment variables with RAGLINE_ prefix.
            // Double underscore separates nested levels; single underscore
            // remains part of the field name.
            .merge(
                Env::prefixed("RAGLINE_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
            .map_err(|e| RagError::Config(e.to_string()))?;

        // Credential fallback for setups that already export OPENAI_API_KEY
        if settings.api_key.is_none() {
            settings.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty());
        }

        settings.chunking.validate()?;
        Ok(settings)
    }

    /// Return the credential, or fail before any network work is attempted.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(RagError::MissingCredential)
    }

    /// Path of the persisted index file inside `index_path`.
    pub fn index_file(&self) -> PathBuf {
        self.index_path.join("store.json")
    }

    /// Find the workspace config by looking for a .ragline directory,
    /// searching from the current directory up to the filesystem root.
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".ragline");
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Save current configuration to file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RagError::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let toml_string =
            toml::to_string_pretty(self).map_err(|e| RagError::Config(e.to_string()))?;
        std::fs::write(path, toml_string).map_err(|e| RagError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Create a default settings file at `.ragline/settings.toml`.
    pub fn init_config_file(force: bool) -> Result<PathBuf> {
        let config_path = PathBuf::from(".ragline/settings.toml");

        if !force && config_path.exists() {
            return Err(RagError::Config(
                "configuration file already exists. Use --force to overwrite".to_string(),
            ));
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
