use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials for the manager account created at startup, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapManager {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub bootstrap_manager: Option<BootstrapManager>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;

        let secret = lookup("JWT_SECRET").context("JWT_SECRET is not set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let ttl_minutes = parse_or(&lookup, "JWT_TTL_MINUTES", 120)?;
        if ttl_minutes <= 0 {
            anyhow::bail!("JWT_TTL_MINUTES must be positive");
        }
        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "shop".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "shop-clients".into()),
            ttl_minutes,
        };

        let bootstrap_manager = match (
            lookup("BOOTSTRAP_MANAGER_USERNAME"),
            lookup("BOOTSTRAP_MANAGER_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapManager { username, password }),
            (None, None) => None,
            _ => anyhow::bail!(
                "BOOTSTRAP_MANAGER_USERNAME and BOOTSTRAP_MANAGER_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 8080)?,
            jwt,
            bootstrap_manager,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value `{raw}`")),
        None => Ok(default),
    }
}
