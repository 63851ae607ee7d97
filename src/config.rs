use std::env;

use crate::error::AppError;

pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    /// Public base URL used in links sent by mail.
    pub app_url: String,
    pub mail_from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| AppError::InternalServerError(format!("{} must be set", key)))
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::InternalServerError("SERVER_PORT must be a number".into())
            })?,
            None => 8080,
        };
        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|hours: &i64| *hours > 0)
                .ok_or_else(|| {
                    AppError::InternalServerError(
                        "SESSION_TTL_HOURS must be a positive number".into(),
                    )
                })?,
            None => 24,
        };
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let app_url = lookup("APP_URL")
            .unwrap_or_else(|| format!("http://{}:{}", server_host, server_port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port,
            server_host,
            jwt_secret: required("JWT_SECRET")?,
            session_ttl_hours,
            app_url,
            mail_from: lookup("MAIL_FROM").unwrap_or_else(|| "noreply@taskadmin.local".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
