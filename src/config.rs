use crate::models::Credentials;
use anyhow::Result;
use serde::Deserialize;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_MIN_DELAY_MS: u64 = 600;
const DEFAULT_MAX_DELAY_MS: u64 = 3000;
const DEFAULT_FAILURE_RATE: f32 = 0.3;
const DEFAULT_SEED_LOGIN: &str = "admin123";
const DEFAULT_SEED_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub min_delay_ms: u64,     // lower latency bound for a simulated call, e.g. 600
    pub max_delay_ms: u64,     // upper latency bound (exclusive), e.g. 3000
    pub failure_rate: f32,     // chance a simulated call fails, e.g. 0.3
    pub seed_login: String,    // pre-provisioned account
    pub seed_password: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::from_filename(".env");
        let cfg = Self {
            min_delay_ms: env_or("MIN_DELAY_MS", DEFAULT_MIN_DELAY_MS)?,
            max_delay_ms: env_or("MAX_DELAY_MS", DEFAULT_MAX_DELAY_MS)?,
            failure_rate: env_or("FAILURE_RATE", DEFAULT_FAILURE_RATE)?,
            seed_login: std::env::var("SEED_LOGIN").unwrap_or_else(|_| DEFAULT_SEED_LOGIN.to_string()),
            seed_password: std::env::var("SEED_PASSWORD").unwrap_or_else(|_| DEFAULT_SEED_PASSWORD.to_string()),
        };

        Ok(cfg)
    }

    pub fn delay_range(&self) -> Range<u64> {
        self.min_delay_ms..self.max_delay_ms
    }

    pub fn seed_credentials(&self) -> Credentials {
        Credentials::new(self.seed_login.clone(), self.seed_password.clone())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}
