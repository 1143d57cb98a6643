use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_QUESTION_COUNT: usize = 25;
pub const DEFAULT_PUBLIC_RPS: u32 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub model: ModelConfig,
    pub question_count: usize,
    pub public_rps: u32,
}

/// Settings for the generative-text provider. The key is optional at boot;
/// a missing key surfaces as a configuration error on the first model call.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            model: ModelConfig {
                api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
                base_url: get_env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                model: get_env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                timeout_secs: get_env_parse_or("MODEL_TIMEOUT_SECS", DEFAULT_MODEL_TIMEOUT_SECS)?,
            },
            question_count: get_env_parse_or("ASSESSMENT_QUESTION_COUNT", DEFAULT_QUESTION_COUNT)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", DEFAULT_PUBLIC_RPS)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
