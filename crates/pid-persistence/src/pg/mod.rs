//! Postgres implementation of `pid_core::store::Store`, built on Diesel +
//! an r2d2 connection pool.
//!
//! Every mint runs inside a single `SERIALIZABLE`-adjacent transaction
//! (Diesel's `read_write` builder) with the `Seed` row locked via
//! `SELECT ... FOR UPDATE`, so two concurrent mints for the same kind
//! serialize on that row rather than racing in application code. A
//! serialization failure from the backend is mapped to
//! `PersistenceError::SerializationConflict` and surfaces to the caller
//! untouched — this crate's retry helper only retries transient
//! connection/pool failures, never a serialization conflict (see
//! `with_retry` below and `PersistenceError::is_internally_retryable`).

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::result::{Error as DieselError, OptionalExtension};
use log::{debug, warn};

use pid_core::store::{Store, StoreTxn, TxnOutcome};
use pid_domain::{EngineError, Kind};

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{pid_minted, pid_seed};

pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Abstracts "get me a connection" so tests can swap in a differently
/// sized pool without touching `PgStore`.
pub trait ConnectionProvider: Send + Sync {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool.get().map_err(PersistenceError::from)
    }
}

/// Retries `f` up to 3 times, with a small linear backoff, but only for
/// errors `PersistenceError::is_internally_retryable` considers
/// transient. A serialization conflict is never among them — it goes
/// straight back to the caller.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
where
    F: FnMut() -> Result<T, PersistenceError>,
{
    let mut attempt = 0;
    loop {
        match f() {
            Err(e) if e.is_internally_retryable() && attempt < 3 => {
                let delay_ms = 15 * (attempt + 1);
                warn!("retryable persistence error (attempt {}): {e} -> sleeping {delay_ms}ms", attempt + 1);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Error type threaded through a Diesel transaction closure. Diesel
/// requires the closure's error type to implement
/// `From<diesel::result::Error>` so it can detect and propagate its own
/// internal failures (e.g. a failed `COMMIT`); `EngineError` lives in
/// `pid-domain`, which has no Diesel dependency, so this crate-local
/// wrapper carries the conversion instead.
enum TxnError {
    Engine(EngineError),
}

impl From<DieselError> for TxnError {
    fn from(e: DieselError) -> Self {
        TxnError::Engine(PersistenceError::from(e).into())
    }
}

/// The open-transaction view of a Postgres connection, implementing
/// `StoreTxn` with plain Diesel queries against `pid_seed` / `pid_minted`.
struct PgTxn<'a> {
    conn: &'a mut PgConnection,
}

impl StoreTxn for PgTxn<'_> {
    fn get_seed(&mut self, kind: Kind) -> Result<Option<u64>, EngineError> {
        pid_seed::table
            .filter(pid_seed::type_.eq(kind.as_str()))
            .select(pid_seed::value)
            .for_update()
            .first::<i64>(self.conn)
            .optional()
            .map(|opt| opt.map(|v| v as u64))
            .map_err(|e| PersistenceError::from(e).into())
    }

    fn init_seed(&mut self, kind: Kind, value: u64) -> Result<(), EngineError> {
        diesel::insert_into(pid_seed::table)
            .values((pid_seed::type_.eq(kind.as_str()), pid_seed::value.eq(value as i64)))
            .execute(self.conn)
            .map(|_| ())
            .map_err(|e| PersistenceError::from(e).into())
    }

    fn set_seed(&mut self, kind: Kind, value: u64) -> Result<(), EngineError> {
        diesel::update(pid_seed::table.filter(pid_seed::type_.eq(kind.as_str())))
            .set(pid_seed::value.eq(value as i64))
            .execute(self.conn)
            .map(|_| ())
            .map_err(|e| PersistenceError::from(e).into())
    }

    fn find_pid(&mut self, kind: Kind, identifier: &str) -> Result<Option<DateTime<Utc>>, EngineError> {
        pid_minted::table
            .filter(pid_minted::type_.eq(kind.as_str()).and(pid_minted::identifier.eq(identifier)))
            .select(pid_minted::created)
            .first::<DateTime<Utc>>(self.conn)
            .optional()
            .map_err(|e| PersistenceError::from(e).into())
    }

    fn add_pid(&mut self, kind: Kind, identifier: &str, created_at: DateTime<Utc>) -> Result<(), EngineError> {
        diesel::insert_into(pid_minted::table)
            .values((
                pid_minted::type_.eq(kind.as_str()),
                pid_minted::identifier.eq(identifier),
                pid_minted::created.eq(created_at),
            ))
            .execute(self.conn)
            .map(|_| ())
            .map_err(|e| PersistenceError::from(e).into())
    }
}

/// Postgres-backed `Store`. Construct via `PgStore::new` with a
/// `PoolProvider` wrapping a pool from `build_pool`/`build_dev_pool_from_env`.
pub struct PgStore<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> PgStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> Store for PgStore<P> {
    fn with_transaction(
        &self,
        f: &mut dyn FnMut(&mut dyn StoreTxn) -> Result<TxnOutcome, EngineError>,
    ) -> Result<TxnOutcome, EngineError> {
        // Retry is scoped to acquiring a connection from the pool, never to
        // the transaction body itself: a serialization conflict raised
        // inside the transaction must reach the caller untouched, so only
        // the genuinely transient "couldn't get a connection" case gets a
        // second try here.
        let mut conn: r2d2::PooledConnection<ConnectionManager<PgConnection>> =
            with_retry(|| self.provider.connection()).map_err(EngineError::from)?;

        conn.build_transaction()
            .read_write()
            .run(|tx_conn| -> Result<TxnOutcome, TxnError> {
                let mut txn = PgTxn { conn: tx_conn };
                f(&mut txn).map_err(TxnError::Engine)
            })
            .map_err(|TxnError::Engine(e)| e)
    }

    fn has_pid(&self, kind: Kind, identifier: &str) -> Result<bool, EngineError> {
        let result: Result<bool, PersistenceError> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            let found = pid_minted::table
                .filter(pid_minted::type_.eq(kind.as_str()).and(pid_minted::identifier.eq(identifier)))
                .select(pid_minted::created)
                .first::<DateTime<Utc>>(&mut conn)
                .optional()?;
            Ok(found.is_some())
        });
        result.map_err(EngineError::from)
    }
}

/// Builds an r2d2 Postgres pool and runs pending migrations against it
/// once, before returning.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let min_size = min_size.max(1);
    let max_size = max_size.max(1).max(min_size);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .min_idle(Some(min_size))
        .max_size(max_size)
        .build(manager)
        .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;

    let mut conn = pool.get().map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
    run_pending_migrations(&mut conn)?;
    debug!("build_pool: migrations applied, pool ready (min={min_size}, max={max_size})");
    Ok(pool)
}

/// Convenience wrapper: loads `.env` + `DATABASE_URL`/pool-size env vars
/// via `DbConfig::from_env`, then builds an already-migrated pool.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    let cfg = DbConfig::from_env();
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
