use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::application::indexer::UnreadablePolicy;
use crate::infrastructure::embedding::{model_from_name, SUPPORTED_MODELS};

pub const CONFIG_PATH_ENV: &str = "VAULT_ASK_CONFIG_PATH";
pub const DEFAULT_CONFIG_FILE: &str = "vault_ask.toml";
const ENV_PREFIX: &str = "VAULT_ASK_";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "vault-ask")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VaultConfig {
    /// Root of the note tree.
    pub path: PathBuf,
    /// File extensions treated as notes, without the leading dot.
    pub extensions: Vec<String>,
    /// What to do with files or directories that cannot be read.
    pub on_unreadable: UnreadablePolicy,
}

impl Default for VaultConfig {
    fn default() -> Self {
        let path = UserDirs::new()
            .map(|dirs| dirs.home_dir().join("vault"))
            .unwrap_or_else(|| PathBuf::from("vault"));
        Self {
            path,
            extensions: vec!["md".to_string()],
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Upper bound on the characters of context placed in the prompt.
    pub max_context_chars: usize,
    #[serde(default)]
    pub collection_name: Option<String>, // random when unset
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 2,
            max_context_chars: 12_000,
            collection_name: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub model: String,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-minilm-l6-v2".to_string(),
            cache_dir: project_dirs().map(|dirs| dirs.cache_dir().join("models")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Name of the environment variable holding the API key.
    /// The key itself is never read from the config file.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            max_retries: 3,
            initial_backoff_ms: 500,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AskConfig {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Loads configuration from defaults, a TOML file and `VAULT_ASK_*` environment variables.
///
/// The file is `config_path` when given, else the path in `VAULT_ASK_CONFIG_PATH`,
/// else `vault_ask.toml` in the working directory. An explicitly named file must
/// exist; the fallback file is optional. Nested keys in the environment use `__`,
/// e.g. `VAULT_ASK_LLM__MODEL=gpt-4o-mini`.
pub fn load_config(config_path: Option<&Path>) -> Result<AskConfig> {
    let explicit = config_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

    let file = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
            }
            log::info!("Using config file {}", path.display());
            path
        }
        None => {
            log::debug!("No config path given, falling back to {}", DEFAULT_CONFIG_FILE);
            PathBuf::from(DEFAULT_CONFIG_FILE)
        }
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(AskConfig::default()))
        .merge(Toml::file(&file))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: AskConfig = figment.extract().context("Failed to extract configuration")?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AskConfig) -> Result<()> {
    if config.vault.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
        return Err(anyhow::anyhow!("vault.extensions must name at least one extension"));
    }
    if config.retrieval.top_k == 0 {
        return Err(anyhow::anyhow!("retrieval.top_k must be at least 1"));
    }
    if config.llm.timeout_secs == 0 {
        return Err(anyhow::anyhow!("llm.timeout_secs must be at least 1"));
    }
    if model_from_name(&config.embedding.model).is_none() {
        return Err(anyhow::anyhow!(
            "Unknown embedding.model '{}', expected one of {:?}",
            config.embedding.model,
            SUPPORTED_MODELS
        ));
    }
    Ok(())
}
