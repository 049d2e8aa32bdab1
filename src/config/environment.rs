use std::env;
use std::str::FromStr;

pub const DEFAULT_GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_secret: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_ttl_hours: i64,
    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,
    pub google_userinfo_url: String,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        // An empty secret would let anyone self-register as admin
        let admin_secret = env::var("ADMIN_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            database_url,
            jwt_secret,
            admin_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            session_ttl_hours: parse_or("SESSION_TTL_HOURS", 24)?,
            rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", 600)?,
            rate_limit_burst: parse_or("RATE_LIMIT_BURST", 120)?,
            google_userinfo_url: env::var("GOOGLE_USERINFO_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_USERINFO_URL.to_string()),
            run_migrations: parse_or("RUN_MIGRATIONS", false)?,
        })
    }

    /// Configuration with defaults for everything but the connection string and secrets.
    pub fn with_defaults(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            admin_secret: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            db_max_connections: 10,
            session_ttl_hours: 24,
            rate_limit_per_minute: 600,
            rate_limit_burst: 120,
            google_userinfo_url: DEFAULT_GOOGLE_USERINFO_URL.to_string(),
            run_migrations: false,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}
