// Configuration module
// TOML-backed settings for the Ollama connection, chunking, and data paths

pub mod settings;

pub use settings::{Config, ConfigError, OllamaConfig, get_config_dir};
