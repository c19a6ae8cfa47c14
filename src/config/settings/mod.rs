
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::embeddings::chunking::ChunkingConfig;
use crate::embeddings::ollama::DEFAULT_EMBEDDING_DIMENSION;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
    pub embedding_dimension: u32,
}

impl Default for OllamaConfig {
    #[inline]
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "nomic-embed-text:latest".to_string(),
            batch_size: 16,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid embedding dimension: {0} (must be between 64 and 4096)")]
    InvalidEmbeddingDimension(u32),
    #[error("Invalid max chunk size: {0} (must be between 100 and 20000 characters)")]
    InvalidMaxChunkChars(usize),
    #[error("Chunk overlap ({0}) must be smaller than the chunk size ({1})")]
    OverlapTooLarge(usize, usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from `config.toml` in the given directory, falling
    /// back to defaults if the file does not exist.
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                ollama: OllamaConfig::default(),
                chunking: ChunkingConfig::default(),
                base_dir: config_dir.as_ref().to_path_buf(),
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        fs::create_dir_all(&self.base_dir).map_err(|_| ConfigError::DirectoryError)?;

        let config_path = self.base_dir.join("config.toml");
        let content = toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ollama.protocol != "http" && self.ollama.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.ollama.protocol.clone()));
        }
        if self.ollama.port == 0 {
            return Err(ConfigError::InvalidPort(self.ollama.port));
        }
        if self.ollama.batch_size == 0 || self.ollama.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.ollama.batch_size));
        }
        if self.ollama.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.ollama.model.clone()));
        }
        if self.ollama.embedding_dimension < 64 || self.ollama.embedding_dimension > 4096 {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.ollama.embedding_dimension,
            ));
        }
        if self.chunking.max_chunk_chars < 100 || self.chunking.max_chunk_chars > 20000 {
            return Err(ConfigError::InvalidMaxChunkChars(
                self.chunking.max_chunk_chars,
            ));
        }
        if self.chunking.overlap_chars >= self.chunking.max_chunk_chars {
            return Err(ConfigError::OverlapTooLarge(
                self.chunking.overlap_chars,
                self.chunking.max_chunk_chars,
            ));
        }
        Ok(())
    }

    /// Base URL of the Ollama server
    #[inline]
    pub fn ollama_url(&self) -> Result<Url> {
        let url = format!(
            "{}://{}:{}",
            self.ollama.protocol, self.ollama.host, self.ollama.port
        );
        Url::parse(&url).with_context(|| format!("Invalid Ollama URL: {}", url))
    }

    /// Directory holding the LanceDB vector collections
    #[inline]
    pub fn vectors_dir(&self) -> PathBuf {
        self.base_dir.join("vectors")
    }
}

/// Resolve the per-user configuration directory for cvmatch
#[inline]
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(ConfigError::DirectoryError)?;
    Ok(base.join("cvmatch"))
}
