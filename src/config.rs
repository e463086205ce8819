//! Configuration for campaign-studio.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CAMPAIGN_STUDIO_HOME, CAMPAIGN_STUDIO_AGENT_URL,
//!    CAMPAIGN_STUDIO_KB_URL, CAMPAIGN_STUDIO_API_KEY)
//! 2. Config file (.campaign-studio/config.yaml)
//! 3. Defaults (~/.campaign-studio)
//!
//! Config file discovery:
//! - Searches current directory and parents for .campaign-studio/config.yaml
//! - A relative `home` is resolved against the .campaign-studio/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::AgentRole;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".campaign-studio";

const DEFAULT_AGENT_URL: &str = "http://localhost:8080/api/agent";
const DEFAULT_KB_URL: &str = "http://localhost:8080/api/rag";
const DEFAULT_CONTENT_AGENT: &str = "content-marketing-manager";
const DEFAULT_GRAPHIC_AGENT: &str = "graphic-designer";
const DEFAULT_KB_ID: &str = "brand-knowledge";
const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub home: Option<String>,
    #[serde(default)]
    pub agent: Option<AgentConfig>,
    #[serde(default)]
    pub knowledge_base: Option<KnowledgeBaseConfig>,
    pub request_timeout_seconds: Option<u64>,
    pub sample_data: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub endpoint: Option<String>,
    pub content_agent_id: Option<String>,
    pub graphic_agent_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub endpoint: Option<String>,
    pub id: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the state directory (campaign snapshot lives here)
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub agent: AgentSettings,
    pub knowledge_base: KnowledgeBaseSettings,
    /// Sent as `x-api-key` to both services; only ever read from the environment
    pub api_key: Option<String>,
    pub request_timeout_seconds: u64,
    /// Default for the sample-data overlay toggle
    pub sample_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    pub endpoint: String,
    pub content_agent_id: String,
    pub graphic_agent_id: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AGENT_URL.to_string(),
            content_agent_id: DEFAULT_CONTENT_AGENT.to_string(),
            graphic_agent_id: DEFAULT_GRAPHIC_AGENT.to_string(),
        }
    }
}

impl AgentSettings {
    /// Agent identity used for a flow
    pub fn agent_id(&self, role: AgentRole) -> &str {
        match role {
            AgentRole::Content => &self.content_agent_id,
            AgentRole::Graphic => &self.graphic_agent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBaseSettings {
    pub endpoint: String,
    pub id: String,
}

impl Default for KnowledgeBaseSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_KB_URL.to_string(),
            id: DEFAULT_KB_ID.to_string(),
        }
    }
}

impl ResolvedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file over the defaults
fn apply_file(config: ConfigFile, config_path: &Path, default_home: PathBuf) -> ResolvedConfig {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let home = config
        .home
        .as_deref()
        .map(|h| resolve_path(config_dir, h))
        .unwrap_or(default_home);

    let defaults = AgentSettings::default();
    let agent = match config.agent {
        Some(a) => AgentSettings {
            endpoint: a.endpoint.unwrap_or(defaults.endpoint),
            content_agent_id: a.content_agent_id.unwrap_or(defaults.content_agent_id),
            graphic_agent_id: a.graphic_agent_id.unwrap_or(defaults.graphic_agent_id),
        },
        None => defaults,
    };

    let defaults = KnowledgeBaseSettings::default();
    let knowledge_base = match config.knowledge_base {
        Some(kb) => KnowledgeBaseSettings {
            endpoint: kb.endpoint.unwrap_or(defaults.endpoint),
            id: kb.id.unwrap_or(defaults.id),
        },
        None => defaults,
    };

    ResolvedConfig {
        home,
        config_file: Some(config_path.to_path_buf()),
        agent,
        knowledge_base,
        api_key: None,
        request_timeout_seconds: config
            .request_timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        sample_data: config.sample_data.unwrap_or(false),
    }
}

/// Apply environment overrides
fn apply_env(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(home) = std::env::var("CAMPAIGN_STUDIO_HOME") {
        config.home = PathBuf::from(home);
    }
    if let Ok(url) = std::env::var("CAMPAIGN_STUDIO_AGENT_URL") {
        config.agent.endpoint = url;
    }
    if let Ok(url) = std::env::var("CAMPAIGN_STUDIO_KB_URL") {
        config.knowledge_base.endpoint = url;
    }
    config.api_key = std::env::var("CAMPAIGN_STUDIO_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    config
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(CONFIG_DIR);

    let config = match find_config_file() {
        Some(config_path) => {
            let file = load_config_file(&config_path)?;
            apply_file(file, &config_path, default_home)
        }
        None => ResolvedConfig {
            home: default_home,
            config_file: None,
            agent: AgentSettings::default(),
            knowledge_base: KnowledgeBaseSettings::default(),
            api_key: None,
            request_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            sample_data: false,
        },
    };

    Ok(apply_env(config))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
