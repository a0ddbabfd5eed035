use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_classify::remote::{RemoteConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use crate::state::{ensure_tally_home, tally_home};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteSection {
    /// When false, only the keyword classifier is used
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 10,
            timeout_secs: 10,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

impl RemoteSection {
    /// Build the adapter config, taking the token from `lookup(api_key_env)`.
    ///
    /// A missing token is only a warning: requests go out unauthenticated and
    /// their failures fall back to keywords.
    pub fn to_remote_config(&self, lookup: impl Fn(&str) -> Option<String>) -> RemoteConfig {
        let api_key = lookup(&self.api_key_env).filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(
                var = %self.api_key_env,
                "no API key set; remote categorization will fall back to keywords"
            );
        }
        RemoteConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_tally_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    println!("# {}", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
