use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub mongo_db: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub list_rate_limit_per_minute: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            mongo_uri: env::var("MONGO_URI")
                .unwrap_or_else(|_| {
                    warn!("MONGO_URI not set, using local default");
                    "mongodb://localhost:27017".to_string()
                }),
            mongo_db: env::var("MONGO_DB")
                .unwrap_or_else(|_| {
                    warn!("MONGO_DB not set, using default database name");
                    "gp_portal".to_string()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(45),
            list_rate_limit_per_minute: env::var("LIST_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty() && !self.mongo_uri.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_db: "gp_portal".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_minutes: 45,
            list_rate_limit_per_minute: 30,
        }
    }

    #[test]
    fn unconfigured_without_secret() {
        let mut config = base_config();
        config.jwt_secret.clear();
        assert!(!config.is_configured());
    }

    #[test]
    fn configured_with_secret() {
        assert!(base_config().is_configured());
    }
}
