// Process-wide configuration, loaded once at startup and never mutated.

use std::env;

/// Immutable application configuration.
///
/// Built from the environment exactly once in `main` and shared through
/// `AppState`; nothing reads process environment variables after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// JWT signing secret. Required: there is deliberately no fallback value.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default 7 days).
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds (default 30 days).
    pub refresh_token_ttl: i64,
    /// Allowed CORS origins; `*` means any origin.
    pub allowed_origins: Vec<String>,
}

pub const DEFAULT_ACCESS_TOKEN_TTL: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_REFRESH_TOKEN_TTL: i64 = 30 * 24 * 60 * 60;

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        let access_token_ttl = parse_ttl("JWT_EXPIRE_SECONDS", DEFAULT_ACCESS_TOKEN_TTL)?;
        let refresh_token_ttl = parse_ttl("JWT_REFRESH_EXPIRE_SECONDS", DEFAULT_REFRESH_TOKEN_TTL)?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            access_token_ttl,
            refresh_token_ttl,
            allowed_origins,
        })
    }
}

fn parse_ttl(var: &str, default: i64) -> Result<i64, String> {
    match env::var(var) {
        Ok(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| format!("{} must be a positive number of seconds", var)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttls_match_documented_expiries() {
        assert_eq!(DEFAULT_ACCESS_TOKEN_TTL, 604_800);
        assert_eq!(DEFAULT_REFRESH_TOKEN_TTL, 2_592_000);
    }

    #[test]
    fn parse_ttl_rejects_non_positive_values() {
        std::env::set_var("TEST_TTL_ZERO", "0");
        assert!(parse_ttl("TEST_TTL_ZERO", 60).is_err());

        std::env::set_var("TEST_TTL_NEG", "-5");
        assert!(parse_ttl("TEST_TTL_NEG", 60).is_err());

        std::env::remove_var("TEST_TTL_MISSING");
        assert_eq!(parse_ttl("TEST_TTL_MISSING", 60).unwrap(), 60);
    }
}
