use anyhow::{Result, anyhow};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub verifier: Verifier,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub providers: HashMap<String, ProviderOverride>,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub tls: Option<Tls>,
}

#[derive(Debug, Deserialize)]
pub struct Tls {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Verifier {
    pub backend: String, // "fake" or "real"
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// 0 disables the sweeper; expired tokens then go away only when read.
    #[serde(default)]
    pub sweep_interval_secs: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            sweep_interval_secs: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderOverride {
    pub endpoint: String,
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_ttl_secs() -> u64 {
    60 * 60
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Environment overrides look like `TOKENGATE__HTTP__ADDRESS=0.0.0.0:4000`.
const ENV_PREFIX: &str = "TOKENGATE";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);
    build(Config::builder().add_source(File::with_name(path)))
}

pub fn parse_settings_str(toml: &str) -> Result<Settings> {
    build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let settings: Settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
