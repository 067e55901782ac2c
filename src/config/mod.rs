use crate::core::{timezone::parse_timezone, AppError, Currency, Result};
use chrono_tz::Tz;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub platform: PlatformConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Timezone every date window and report boundary is evaluated in
    pub business_timezone: Tz,
    /// Currency used to format amounts in exported reports
    pub report_currency: Currency,
}

/// Hosted backend platform (Auth admin API, Storage API, session tokens)
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub base_url: String,
    pub service_role_key: String,
    pub jwt_secret: String,
    pub media_bucket: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                business_timezone: parse_timezone(
                    &env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "America/Bogota".to_string()),
                )?,
                report_currency: env::var("REPORT_CURRENCY")
                    .unwrap_or_else(|_| "COP".to_string())
                    .parse()
                    .map_err(AppError::Configuration)?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            platform: PlatformConfig {
                base_url: env::var("SUPABASE_URL")
                    .map_err(|_| AppError::Configuration("SUPABASE_URL not set".to_string()))?
                    .trim_end_matches('/')
                    .to_string(),
                service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").map_err(|_| {
                    AppError::Configuration("SUPABASE_SERVICE_ROLE_KEY not set".to_string())
                })?,
                jwt_secret: env::var("SUPABASE_JWT_SECRET").map_err(|_| {
                    AppError::Configuration("SUPABASE_JWT_SECRET not set".to_string())
                })?,
                media_bucket: env::var("MEDIA_BUCKET").unwrap_or_else(|_| "media".to_string()),
            },
            security: SecurityConfig {
                rate_limit_per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid RATE_LIMIT_PER_MINUTE".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        if !self.platform.base_url.starts_with("http") {
            return Err(AppError::Configuration(format!(
                "SUPABASE_URL must be an http(s) URL, got '{}'",
                self.platform.base_url
            )));
        }

        if self.platform.jwt_secret.len() < 16 {
            return Err(AppError::Configuration(
                "SUPABASE_JWT_SECRET is too short".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }
}
