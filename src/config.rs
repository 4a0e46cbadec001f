use std::env;

use chrono::{Duration, Utc};

pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let token_ttl_days = parse_token_ttl_days(env::var("TOKEN_TTL_DAYS").ok())?;
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            token_ttl_days,
        })
    }
}

/// Unset means the default. A set value must be a positive day count whose
/// expiry is still a representable timestamp.
fn parse_token_ttl_days(value: Option<String>) -> anyhow::Result<i64> {
    let Some(value) = value else {
        return Ok(DEFAULT_TOKEN_TTL_DAYS);
    };
    let days = value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|days| *days > 0)
        .ok_or_else(|| anyhow::anyhow!("TOKEN_TTL_DAYS must be a positive number of days"))?;
    Duration::try_days(days)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| anyhow::anyhow!("TOKEN_TTL_DAYS is out of range: {days}"))?;
    Ok(days)
}
