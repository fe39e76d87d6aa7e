use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://2factor.in/API/V1";
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

/// Process-wide settings, read once at startup and never mutated.
#[derive(Debug)]
pub struct RelayConfig {
    pub provider: ProviderConfig,
    pub cors: CorsConfig,
    pub bind_addr: SocketAddr,
}

#[derive(Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_authorization: bool,
}

impl RelayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            provider: ProviderConfig::from_env()?,
            cors: CorsConfig::from_env(),
            bind_addr: bind_addr_from_env(),
        })
    }
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key,
            timeout: None,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = first_env(&["TWOFACTOR_API_KEY", "TWO_FACTOR_API_KEY", "SMS_OTP_API_KEY"])
            .ok_or_else(|| anyhow::anyhow!("provider API key missing (set TWOFACTOR_API_KEY)"))?;
        let base_url = env_string("TWOFACTOR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let mut config = Self::new(base_url, SecretString::new(api_key));
        config.timeout = env_u64("TWOFACTOR_TIMEOUT_SECS").map(Duration::from_secs);
        Ok(config)
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        CorsConfig {
            allow_origin: env_string("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".into()),
            allow_authorization: env_bool("CORS_ALLOW_AUTHORIZATION").unwrap_or(false),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".into(),
            allow_authorization: false,
        }
    }
}

fn bind_addr_from_env() -> SocketAddr {
    if let Some(raw) = env_string("RELAY_BIND_ADDR") {
        match raw.parse() {
            Ok(addr) => return addr,
            Err(_) => warn!("RELAY_BIND_ADDR={raw} is not a socket address; ignoring"),
        }
    }
    let (ip, default_port) = DEFAULT_BIND_ADDR;
    let port = env_string("PORT")
        .and_then(|p| match p.parse() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!("PORT={p} is not a valid port; using {default_port}");
                None
            }
        })
        .unwrap_or(default_port);
    SocketAddr::from((ip, port))
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env_string(key))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{key}={raw} is not a whole number; ignoring");
            None
        }
    }
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|v| {
        let val = v.trim().to_ascii_lowercase();
        match val.as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => {
                warn!("{key}={v} is not a boolean; ignoring");
                None
            }
        }
    })
}
