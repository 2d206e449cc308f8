//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use inkwell_infra::database::DatabaseConfig;
use inkwell_infra::JwtConfig;
use inkwell_infra::auth::DEV_SECRET;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub forms: FormLimits,
    pub session: SessionConfig,
}

/// Limits enforced by the form validators.
#[derive(Debug, Clone, Copy)]
pub struct FormLimits {
    pub min_password_length: usize,
    pub max_post_length: usize,
}

/// Room for the short fields and the field names of a form body.
const FORM_OVERHEAD_BYTES: usize = 16 * 1024;

impl FormLimits {
    /// Largest accepted urlencoded body. Content and description may both
    /// reach `max_post_length` characters, each at worst a percent-encoded
    /// 4-byte sequence (12 bytes).
    pub fn body_limit(&self) -> usize {
        2 * self.max_post_length * 12 + FORM_OVERHEAD_BYTES
    }
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            max_post_length: 20_000,
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Send the cookie over HTTPS only.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            secure: false,
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
fn jwt_from_env() -> JwtConfig {
    let defaults = JwtConfig::default();
    let secret = env::var("JWT_SECRET").unwrap_or(defaults.secret);
    if secret == DEV_SECRET {
        tracing::warn!("JWT_SECRET is not set; sessions are signed with the development secret");
    }

    JwtConfig {
        secret,
        expiration_hours: parsed("JWT_EXPIRATION_HOURS", defaults.expiration_hours),
        issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
            sql_logging: parsed("DB_SQL_LOGGING", true),
        });

        let form_defaults = FormLimits::default();
        let session_defaults = SessionConfig::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            database,
            jwt: jwt_from_env(),
            forms: FormLimits {
                min_password_length: parsed(
                    "MIN_PASSWORD_LENGTH",
                    form_defaults.min_password_length,
                ),
                max_post_length: parsed("MAX_POST_LENGTH", form_defaults.max_post_length),
            },
            session: SessionConfig {
                cookie_name: env::var("SESSION_COOKIE_NAME")
                    .unwrap_or(session_defaults.cookie_name),
                secure: parsed("SESSION_COOKIE_SECURE", session_defaults.secure),
            },
        }
    }
}
