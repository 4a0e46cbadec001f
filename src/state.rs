use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::config::{AppConfig, DEFAULT_TOKEN_TTL_DAYS};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub auth: AuthSettings,
}

/// Token signing material shared by issuing and verifying code paths.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            orm,
            auth: AuthSettings {
                jwt_secret: config.jwt_secret.clone(),
                token_ttl: Duration::try_days(config.token_ttl_days)
                    .unwrap_or_else(|| Duration::days(DEFAULT_TOKEN_TTL_DAYS)),
            },
        }
    }
}
