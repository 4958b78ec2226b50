//! Environment-driven relay configuration.
//!
//! All settings are read once at startup through [`RelayEnv`] so parsing can
//! be exercised in tests without mutating the process environment. Invalid
//! values fail fast with a [`SettingsError`] naming the variable, the value,
//! and the expected format.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use url::Url;

use crate::outbound::cache::{CachePolicy, MAX_CACHE_TTL};

pub const BIND_ADDR_ENV: &str = "POINT_RELAY_BIND_ADDR";
pub const BACKEND_URL_ENV: &str = "POINT_RELAY_BACKEND_URL";
pub const BACKEND_ENDPOINT_ENV: &str = "POINT_RELAY_BACKEND_ENDPOINT";
pub const BACKEND_TIMEOUT_MS_ENV: &str = "POINT_RELAY_BACKEND_TIMEOUT_MS";
pub const CACHE_BACKEND_ENV: &str = "POINT_RELAY_CACHE_BACKEND";
pub const CACHE_TTL_SECONDS_ENV: &str = "POINT_RELAY_CACHE_TTL_SECONDS";
pub const CACHE_MAX_ENTRIES_ENV: &str = "POINT_RELAY_CACHE_MAX_ENTRIES";
pub const REDIS_URL_ENV: &str = "POINT_RELAY_REDIS_URL";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_BACKEND_ENDPOINT: &str = "/points";
const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 5;

const SOCKET_EXPECTED: &str = "host:port, e.g. 0.0.0.0:8080";
const URL_EXPECTED: &str = "an absolute http(s) URL";
const ENDPOINT_EXPECTED: &str = "a path such as /points";
const MILLIS_EXPECTED: &str = "a positive integer number of milliseconds";
const SECONDS_EXPECTED: &str = "a whole number of seconds between 0 and 31536000";
const COUNT_EXPECTED: &str = "a positive integer";
const CACHE_BACKEND_EXPECTED: &str = "memory|redis";

/// Environment abstraction for configuration lookups.
pub trait RelayEnv {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRelayEnv;

impl RelayEnv for DefaultRelayEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Errors raised while validating relay configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which store backs the points cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process store; entries are lost on restart.
    Memory,
    /// Shared Redis store reachable at `url`.
    Redis { url: String },
}

/// Validated relay configuration.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    bind_addr: SocketAddr,
    backend_endpoint: Url,
    backend_timeout: Duration,
    cache_backend: CacheBackend,
    cache_policy: CachePolicy,
}

impl RelaySettings {
    /// Load configuration from the real process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a variable holds an invalid value or a
    /// required variable is missing.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_env_with(&DefaultRelayEnv)
    }

    /// Load configuration from a custom environment source.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a variable holds an invalid value or a
    /// required variable is missing.
    pub fn from_env_with(env: &impl RelayEnv) -> Result<Self, SettingsError> {
        let bind_addr = parse_or(env, BIND_ADDR_ENV, DEFAULT_BIND_ADDR, SOCKET_EXPECTED, |raw| {
            raw.parse::<SocketAddr>().ok()
        })?;
        let backend_endpoint = backend_endpoint_from_env(env)?;
        let timeout_ms = parse_or(
            env,
            BACKEND_TIMEOUT_MS_ENV,
            &DEFAULT_BACKEND_TIMEOUT_MS.to_string(),
            MILLIS_EXPECTED,
            |raw| raw.parse::<u64>().ok().filter(|ms| *ms > 0),
        )?;
        let ttl_seconds = parse_or(
            env,
            CACHE_TTL_SECONDS_ENV,
            &DEFAULT_CACHE_TTL_SECONDS.to_string(),
            SECONDS_EXPECTED,
            |raw| {
                raw.parse::<u64>()
                    .ok()
                    .filter(|secs| *secs <= MAX_CACHE_TTL.as_secs())
            },
        )?;
        let max_entries = match non_blank(env, CACHE_MAX_ENTRIES_ENV) {
            Some(raw) => Some(
                raw.parse::<NonZeroUsize>()
                    .map_err(|_| invalid(CACHE_MAX_ENTRIES_ENV, raw, COUNT_EXPECTED))?,
            ),
            None => None,
        };

        Ok(Self {
            bind_addr,
            backend_endpoint,
            backend_timeout: Duration::from_millis(timeout_ms),
            cache_backend: cache_backend_from_env(env)?,
            cache_policy: CachePolicy::new(Duration::from_secs(ttl_seconds), max_entries),
        })
    }

    /// Socket address the HTTP server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Full URL payloads are posted to.
    pub fn backend_endpoint(&self) -> &Url {
        &self.backend_endpoint
    }

    /// Per-request timeout for backend calls.
    pub fn backend_timeout(&self) -> Duration {
        self.backend_timeout
    }

    /// Selected cache store.
    pub fn cache_backend(&self) -> &CacheBackend {
        &self.cache_backend
    }

    /// Expiry and capacity settings for the cache.
    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }
}

fn non_blank(env: &impl RelayEnv, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn invalid(name: &'static str, value: String, expected: &'static str) -> SettingsError {
    SettingsError::InvalidEnv {
        name,
        value,
        expected,
    }
}

fn parse_or<T>(
    env: &impl RelayEnv,
    name: &'static str,
    default: &str,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, SettingsError> {
    let raw = non_blank(env, name).unwrap_or_else(|| default.to_owned());
    parse(raw.trim()).ok_or_else(|| invalid(name, raw, expected))
}

fn backend_endpoint_from_env(env: &impl RelayEnv) -> Result<Url, SettingsError> {
    let base = non_blank(env, BACKEND_URL_ENV).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned());
    let base_url = Url::parse(base.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| invalid(BACKEND_URL_ENV, base.clone(), URL_EXPECTED))?;

    let endpoint =
        non_blank(env, BACKEND_ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_BACKEND_ENDPOINT.to_owned());
    if !endpoint.starts_with('/') {
        return Err(invalid(BACKEND_ENDPOINT_ENV, endpoint, ENDPOINT_EXPECTED));
    }

    let joined = format!("{}{}", base_url.as_str().trim_end_matches('/'), endpoint);
    Url::parse(&joined).map_err(|_| invalid(BACKEND_ENDPOINT_ENV, endpoint, ENDPOINT_EXPECTED))
}

fn cache_backend_from_env(env: &impl RelayEnv) -> Result<CacheBackend, SettingsError> {
    let Some(raw) = non_blank(env, CACHE_BACKEND_ENV) else {
        return Ok(CacheBackend::Memory);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(CacheBackend::Memory),
        "redis" => {
            let url = non_blank(env, REDIS_URL_ENV).ok_or(SettingsError::MissingEnv {
                name: REDIS_URL_ENV,
            })?;
            Ok(CacheBackend::Redis { url })
        }
        _ => Err(invalid(CACHE_BACKEND_ENV, raw, CACHE_BACKEND_EXPECTED)),
    }
}
