//! Orchestrates one mint end to end: read seed, encode, check
//! non-duplicate, advance, record — all inside one `Store` transaction.
//!
//! This is the one place in the engine that calls both the encoder and
//! the store; everything it needs beyond those two is injected at
//! construction (`EncoderConfig`, `Clock`) so the pipeline itself stays a
//! pure sequence of steps over its dependencies, easy to unit test with a
//! fake `Store`.

use log::{debug, warn};
use pid_domain::{Clock, EngineError, Kind, Pid};

use crate::encoder::{self, EncoderConfig};
use crate::store::{Store, TxnOutcome};

/// The engine's public surface: `initialize`, `generate`, `exists`.
///
/// Generic over `S: Store` so the same orchestration logic runs against
/// the Postgres-backed store in `pid-persistence` or an in-memory fake in
/// tests, with no dynamic dispatch on the hot path.
pub struct Generator<S: Store> {
    store: S,
    config: EncoderConfig,
    clock: Box<dyn Clock>,
}

impl<S: Store> Generator<S> {
    pub fn new(store: S, config: EncoderConfig, clock: Box<dyn Clock>) -> Self {
        Self { store, config, clock }
    }

    /// Installs the starting seed for `kind`.
    ///
    /// Idempotent only in the sense that calling it twice for the same
    /// kind is detected and rejected: the second call returns
    /// `AlreadyInitialized` carrying the seed that is actually persisted,
    /// and leaves that seed untouched.
    pub fn initialize(&self, kind: Kind, seed: u64) -> Result<(), EngineError> {
        let outcome = self.store.with_transaction(&mut |txn| {
            match txn.get_seed(kind)? {
                Some(existing_seed) => Ok(TxnOutcome::AlreadyInitialized { existing_seed }),
                None => {
                    txn.init_seed(kind, seed)?;
                    Ok(TxnOutcome::Initialized)
                }
            }
        })?;

        match outcome {
            TxnOutcome::Initialized => {
                debug!("initialize: kind={kind} seed={seed}");
                Ok(())
            }
            TxnOutcome::AlreadyInitialized { existing_seed } => {
                warn!("initialize: kind={kind} already initialized with seed={existing_seed}");
                Err(EngineError::AlreadyInitialized { kind, existing_seed })
            }
            other => unreachable!("initialize transaction produced unexpected outcome: {other:?}"),
        }
    }

    /// Mints one identifier for `kind`.
    ///
    /// Pipeline, run inside a single `Store` transaction:
    /// 1. read the current seed (`NotInitialized` if absent);
    /// 2. encode it;
    /// 3. compute the successor seed;
    /// 4. if the encoded identifier is already minted, fail
    ///    `DuplicatePid` *without* advancing the seed;
    /// 5. otherwise record the identifier and advance the seed, atomically.
    ///
    /// No retry happens here: a serialization conflict from two
    /// concurrent callers racing on the same kind surfaces as
    /// `EngineError::StorageError` and is the caller's responsibility to
    /// retry, per the engine's error-propagation policy.
    pub fn generate(&self, kind: Kind) -> Result<Pid, EngineError> {
        let now = self.clock.now();
        let config = &self.config;
        let outcome = self.store.with_transaction(&mut |txn| {
            let seed = txn.get_seed(kind)?.ok_or(EngineError::NotInitialized(kind))?;
            let identifier = encoder::encode(kind, seed, config);
            let next_seed = encoder::advance(kind, seed);

            if let Some(created_at) = txn.find_pid(kind, &identifier)? {
                return Ok(TxnOutcome::Duplicate { used_seed: seed, next_seed, identifier, created_at });
            }

            txn.add_pid(kind, &identifier, now)?;
            txn.set_seed(kind, next_seed)?;
            Ok(TxnOutcome::Minted(Pid { kind, identifier, seed, created_at: now }))
        })?;

        match outcome {
            TxnOutcome::Minted(pid) => {
                debug!("generate: kind={kind} seed={} identifier={}", pid.seed, pid.identifier);
                Ok(pid)
            }
            TxnOutcome::Duplicate { used_seed, next_seed, identifier, created_at } => {
                warn!("generate: kind={kind} duplicate identifier={identifier} at seed={used_seed}");
                Err(EngineError::DuplicatePid { kind, used_seed, next_seed, identifier, created_at })
            }
            other => unreachable!("generate transaction produced unexpected outcome: {other:?}"),
        }
    }

    /// Thin pass-through to the store's duplicate check; no transaction
    /// needed since a single read has no read-modify-write hazard.
    pub fn exists(&self, kind: Kind, identifier: &str) -> Result<bool, EngineError> {
        self.store.has_pid(kind, identifier)
    }
}
