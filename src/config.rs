/*
 * Responsibility
 * - 環境変数や設定の読み込み (SECRET_KEY, PORT, CORS 許可, token TTL など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::token_codec::MAX_TOKEN_TTL_SECONDS;

const DEFAULT_TOKEN_LEEWAY_SECONDS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Admin account seeded into the user store at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Signs and verifies every token; never logged.
    pub secret_key: String,
    // None: tokens carry no `exp` and never expire.
    pub token_ttl_seconds: Option<u64>,
    pub token_leeway_seconds: u64,

    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3001,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let secret_key =
            std::env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;
        if secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid("SECRET_KEY"));
        }

        let token_ttl_seconds = match std::env::var("TOKEN_TTL_SECONDS") {
            Ok(s) => Some(parse_token_ttl(&s)?),
            Err(_) => None,
        };

        let token_leeway_seconds = match std::env::var("TOKEN_LEEWAY_SECONDS") {
            Ok(s) => parse_token_leeway(&s)?,
            Err(_) => DEFAULT_TOKEN_LEEWAY_SECONDS,
        };

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_USERNAME"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.trim().is_empty() => {
                Some(BootstrapAdmin { username, password })
            }
            (Ok(_), Ok(_)) => return Err(ConfigError::Invalid("BOOTSTRAP_ADMIN_USERNAME")),
            (Ok(_), Err(_)) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            (Err(_), Ok(_)) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_USERNAME")),
            (Err(_), Err(_)) => None,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            secret_key,
            token_ttl_seconds,
            token_leeway_seconds,
            bootstrap_admin,
        })
    }
}

// 1..=MAX_TOKEN_TTL_SECONDS; larger values cannot be turned into an `exp` safely.
fn parse_token_ttl(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|ttl| (1..=MAX_TOKEN_TTL_SECONDS).contains(ttl))
        .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))
}

fn parse_token_leeway(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|leeway| *leeway <= MAX_TOKEN_TTL_SECONDS)
        .ok_or(ConfigError::Invalid("TOKEN_LEEWAY_SECONDS"))
}
