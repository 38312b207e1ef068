//! Service configuration
//!
//! Resolution order per key: TOML config file, then environment variables,
//! then defaults. The agent URL is the one required setting; `load` fails
//! fast at startup when it is missing or malformed.

use crate::services::relay::DEFAULT_AGENT_TIMEOUT_SECS;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const CONFIG_PATH_ENV: &str = "CHATRELAY_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Path to the redb database file.
    pub db_path: String,
    /// Remote agent endpoint. Required.
    pub agent_url: String,
    pub agent_timeout_secs: u64,
    /// Allowed CORS origins. Empty or containing "*" means allow any.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    agent: AgentSection,
    #[serde(default)]
    http: HttpSection,
}

#[derive(Debug, Deserialize, Default)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct AgentSection {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct HttpSection {
    cors_origins: Option<Vec<String>>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> anyhow::Result<Self> {
        let file = load_from_file()?.unwrap_or_default();
        Self::resolve(file)
    }

    fn resolve(file: FileConfig) -> anyhow::Result<Self> {
        let host = file
            .server
            .host
            .or_else(|| env::var("CHATRELAY_HOST").ok())
            .unwrap_or_else(default_host);
        let port = match file.server.port {
            Some(port) => port,
            None => match env::var("CHATRELAY_PORT") {
                Ok(value) => value
                    .parse::<u16>()
                    .map_err(|_| anyhow::anyhow!("Invalid CHATRELAY_PORT: {}", value))?,
                Err(_) => default_port(),
            },
        };
        let db_path = match file
            .database
            .path
            .or_else(|| env::var("CHATRELAY_DB_PATH").ok())
        {
            Some(path) => path,
            None => chatrelay_storage::paths::ensure_database_path_string()?,
        };
        let agent_url = file
            .agent
            .url
            .or_else(|| env::var("CHATRELAY_AGENT_URL").ok())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Agent URL not configured: set agent.url in {} or CHATRELAY_AGENT_URL",
                    DEFAULT_CONFIG_FILE
                )
            })?;
        validate_agent_url(&agent_url)?;
        let agent_timeout_secs = match file.agent.timeout_secs {
            Some(secs) => secs,
            None => match env::var("CHATRELAY_AGENT_TIMEOUT_SECS") {
                Ok(value) => value.parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("Invalid CHATRELAY_AGENT_TIMEOUT_SECS: {}", value)
                })?,
                Err(_) => DEFAULT_AGENT_TIMEOUT_SECS,
            },
        };
        let cors_origins = file
            .http
            .cors_origins
            .or_else(|| {
                env::var("CHATRELAY_CORS_ORIGINS").ok().map(|value| {
                    value
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            db_path,
            agent_url,
            agent_timeout_secs,
            cors_origins,
        })
    }
}

fn validate_agent_url(url: &str) -> anyhow::Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| anyhow::anyhow!("Invalid agent URL {}: {}", url, err))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("Agent URL must be http or https, got {}", url);
    }
    Ok(())
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let path = if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        Some(path)
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        Some(DEFAULT_CONFIG_FILE.to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}
