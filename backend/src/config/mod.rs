//! Central module for application-wide configuration settings.
//!
//! Configuration is read once at startup and handed to the services as plain
//! values; nothing in here is consulted again while requests are served.

use anyhow::{Context, Result, ensure};
use chrono::Duration;
use std::env;
use std::str::FromStr;

/// Upper bound for either token lifetime: ten years.
pub const MAX_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub bcrypt_cost: u32,
    pub server_port: u16,
}

/// Immutable settings consumed by the authentication core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let acquire_timeout_seconds = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECONDS", 3u64)?;

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET not set")?;
        ensure!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_ttl_seconds = parse_ttl(&lookup, "ACCESS_TOKEN_TTL", 900)?;
        let refresh_token_ttl_seconds = parse_ttl(&lookup, "REFRESH_TOKEN_TTL", 86400)?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        ensure!(
            (4..=31).contains(&bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31"
        );

        let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16)?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            bcrypt_cost,
            server_port,
        })
    }

    /// The subset of settings the authentication core needs.
    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_ttl: Duration::seconds(self.access_token_ttl_seconds),
            refresh_token_ttl: Duration::seconds(self.refresh_token_ttl_seconds),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

/// Reads a lifetime in seconds, bounded to `1..=MAX_TTL_SECONDS`.
fn parse_ttl<F>(lookup: &F, key: &str, default: i64) -> Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let seconds = parse_or(lookup, key, default)?;
    ensure!(
        (1..=MAX_TTL_SECONDS).contains(&seconds),
        "{key} must be between 1 and {MAX_TTL_SECONDS} seconds"
    );
    Ok(seconds)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a valid number")),
        None => Ok(default),
    }
}
