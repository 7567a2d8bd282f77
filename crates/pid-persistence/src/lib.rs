//! Postgres-backed persistence for the PID engine: connection pooling,
//! embedded migrations, and a `pid_core::store::Store` implementation
//! built on Diesel.
//!
//! Everything here is optional from the engine's point of view — a
//! caller that only needs `encode`/`advance` or wants to test against an
//! in-memory store never needs to depend on this crate at all.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig, EncoderEnvConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgPool, PgStore, PoolProvider};
