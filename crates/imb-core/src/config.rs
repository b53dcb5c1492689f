use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

pub const DEFAULT_IMEI_API_BASE_URL: &str = "https://api.imeicheck.net";
pub const DEFAULT_REGISTRATION_URL: &str = "https://my.telegram.org/auth/telegram";
pub const DEFAULT_SERVICE_ID: u32 = 1;

/// Typed configuration, read once at process start.
#[derive(Clone)]
pub struct Config {
    pub telegram_bot_token: String,

    // Lookup provider
    pub imei_api_key: String,
    pub imei_api_base_url: String,
    pub imei_service_id: u32,

    // Registration
    pub registration_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_bot_token", &"<redacted>")
            .field("imei_api_key", &"<redacted>")
            .field("imei_api_base_url", &self.imei_api_base_url)
            .field("imei_service_id", &self.imei_service_id)
            .field("registration_url", &self.registration_url)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).and_then(non_empty);

        // Required; the legacy names are still accepted.
        let telegram_bot_token = var("TELEGRAM_BOT_TOKEN")
            .or_else(|| var("TOKEN_BOT"))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;
        let imei_api_key = var("IMEI_API_KEY")
            .or_else(|| var("IMEI_API"))
            .ok_or_else(|| {
                Error::Config("IMEI_API_KEY environment variable is required".to_string())
            })?;

        let imei_api_base_url = var("IMEI_API_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_IMEI_API_BASE_URL.to_string());

        let imei_service_id = match var("IMEI_SERVICE_ID") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                Error::Config(format!("IMEI_SERVICE_ID must be a positive integer, got {raw:?}"))
            })?,
            None => DEFAULT_SERVICE_ID,
        };

        let registration_url = var("REGISTRATION_URL")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_REGISTRATION_URL.to_string());

        Ok(Self {
            telegram_bot_token,
            imei_api_key,
            imei_api_base_url,
            imei_service_id,
            registration_url,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
