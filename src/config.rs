use std::{env, fmt::Display, net::IpAddr, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub db_max_connections: u32,
    pub bootstrap_admin: Option<AdminSeed>,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let bootstrap_admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed { username, password }),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: try_load("JWT_TTL_HOURS", 8)?,
            host: try_load("HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: try_load("PORT", 3000)?,
            cors_origin: var("CORS_ORIGIN"),
            db_max_connections: try_load("DB_MAX_CONNECTIONS", 10)?,
            bootstrap_admin,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/can_i_eat_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 8,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            cors_origin: None,
            db_max_connections: 1,
            bootstrap_admin: None,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &str) -> Result<String, AppError> {
    var(key).ok_or_else(|| AppError::internal(format!("{key} must be set")))
}

fn try_load<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::internal(format!("Invalid {key} value: {e}"))
        }),
    }
}
