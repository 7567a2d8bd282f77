//! Connection configuration loaded from the environment, with `.env`
//! support. Mirrors the `DbConfig::from_env` convention: a typed struct
//! the host builds once, not a global singleton the engine reaches for.

use once_cell::sync::Lazy;
use std::env;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
});

/// Forces `.env` to load, for callers that construct `DbConfig` by hand
/// instead of via `from_env`.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    /// Reads `DATABASE_URL` (required), `DATABASE_MIN_CONNECTIONS` and
    /// `DATABASE_MAX_CONNECTIONS` (both optional, default 2/16).
    ///
    /// # Panics
    /// Panics if `DATABASE_URL` is unset — connection configuration is a
    /// startup-time precondition, not a runtime error the engine is
    /// expected to recover from.
    pub fn from_env() -> Self {
        init_dotenv();
        let url = env::var("DATABASE_URL").expect("DATABASE_URL is not set");
        let min_connections =
            env::var("DATABASE_MIN_CONNECTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(2);
        let max_connections =
            env::var("DATABASE_MAX_CONNECTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(16);
        Self { url, min_connections, max_connections }
    }
}

/// DOI/URN formatting options loaded from the environment. Separate from
/// `DbConfig` since it has nothing to do with the connection — it feeds
/// `pid_core::EncoderConfig` instead.
#[derive(Debug, Clone)]
pub struct EncoderEnvConfig {
    pub doi_prefix: String,
    pub doi_namespace: String,
    pub urn_namespace: String,
}

impl EncoderEnvConfig {
    pub fn from_env() -> Self {
        init_dotenv();
        let defaults = pid_core::EncoderConfig::default();
        Self {
            doi_prefix: env::var("PID_DOI_PREFIX").unwrap_or(defaults.doi_prefix),
            doi_namespace: env::var("PID_DOI_NAMESPACE").unwrap_or(defaults.doi_namespace),
            urn_namespace: env::var("PID_URN_NAMESPACE").unwrap_or(defaults.urn_namespace),
        }
    }

    pub fn into_encoder_config(self) -> pid_core::EncoderConfig {
        pid_core::EncoderConfig {
            doi_prefix: self.doi_prefix,
            doi_namespace: self.doi_namespace,
            urn_namespace: self.urn_namespace,
        }
    }
}
