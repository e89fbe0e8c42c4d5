//! Runtime settings read from the environment (a `.env` file is loaded first by the binaries).

use crate::error::ConfigError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

/// Which [`DocumentStore`](crate::store::DocumentStore) implementation backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process store; contents are lost on exit.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err("expected postgres or memory".into()),
        }
    }
}

/// What happens to a user's projects when the user is deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserDeletePolicy {
    /// Projects are left in place with a dangling `user_id`.
    #[default]
    Orphan,
    /// Projects owned by the user are deleted after the user.
    Cascade,
}

impl FromStr for UserDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orphan" => Ok(UserDeletePolicy::Orphan),
            "cascade" => Ok(UserDeletePolicy::Cascade),
            _ => Err("expected orphan or cascade".into()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: String,
    /// Schema holding the `users` and `projects` tables. Always a plain SQL identifier.
    pub schema: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Normalized mount point for the CRUD routes (`/api`), or `None` to serve them at the root.
    pub api_prefix: Option<String>,
    pub body_limit_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub users: usize,
    pub projects: usize,
    /// Fixed RNG seed; unset means fresh randomness on every run.
    pub rng_seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
    pub user_delete_policy: UserDeletePolicy,
    pub seed: SeedConfig,
}

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/portfolio";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset or empty keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let schema = get("STORE_SCHEMA").unwrap_or_else(|| "portfolio".into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "STORE_SCHEMA",
                value: schema,
                reason: "must be a plain SQL identifier".into(),
            });
        }

        let store = StoreConfig {
            backend: parse_or(&get, "STORE_BACKEND", StoreBackend::Postgres)?,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            schema,
            max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 5)?,
        };
        let server = ServerConfig {
            bind_addr: parse_or(&get, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            api_prefix: normalize_prefix(&get("API_PREFIX").unwrap_or_else(|| "/api".into())),
            body_limit_bytes: parse_or(&get, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?,
        };
        let seed = SeedConfig {
            users: parse_or(&get, "SEED_USERS", 25)?,
            projects: parse_or(&get, "SEED_PROJECTS", 100)?,
            rng_seed: get("SEED_RNG").map(|v| parse_value("SEED_RNG", v)).transpose()?,
        };
        Ok(AppConfig {
            store,
            server,
            user_delete_policy: parse_or(&get, "USER_DELETE_POLICY", UserDeletePolicy::default())?,
            seed,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value: raw,
    })
}

fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
