//! The transactional persistence contract the generator orchestrates
//! against. `pid-persistence` provides the Postgres implementation; tests
//! may provide an in-process fake.

use chrono::{DateTime, Utc};
use pid_domain::{EngineError, Kind};

/// One mint's worth of atomic reads and writes against the backing store.
///
/// Implementors own the transaction boundary: `with_transaction` must run
/// `f` against a single backend transaction at an isolation level strong
/// enough to make `get_seed -> set_seed` conflict-serializable (either
/// `SERIALIZABLE` isolation or `REPEATABLE READ` plus an explicit
/// `SELECT ... FOR UPDATE` on the `Seed` row). On any `Err` returned by
/// `f`, the transaction must roll back; nothing `f` did becomes visible.
///
/// The engine itself holds no locks — correctness under concurrent
/// `generate` calls, including calls from independent service instances
/// sharing one backend, comes entirely from this contract.
pub trait Store: Send + Sync {
    /// Runs `f` inside one atomic transaction. Propagates whatever error
    /// `f` returns; the transaction rolls back in that case.
    fn with_transaction(
        &self,
        f: &mut dyn FnMut(&mut dyn StoreTxn) -> Result<TxnOutcome, EngineError>,
    ) -> Result<TxnOutcome, EngineError>;

    /// Read-only pass-through used by `exists`; does not need a
    /// transaction of its own since it has no read-modify-write hazard.
    fn has_pid(&self, kind: Kind, identifier: &str) -> Result<bool, EngineError>;
}

/// The operations available on an open transaction. A fresh trait rather
/// than reusing `Store` keeps "needs a transaction" visible in the type
/// signature of every call site in `Generator`.
pub trait StoreTxn {
    /// Reads the current seed for `kind`, locking the `Seed` row for the
    /// remainder of the transaction (`SELECT ... FOR UPDATE` or
    /// equivalent) so a concurrent mint on the same kind blocks until
    /// this transaction commits or rolls back.
    fn get_seed(&mut self, kind: Kind) -> Result<Option<u64>, EngineError>;

    /// Inserts the first `Seed` row for `kind`. Callers must have checked
    /// `get_seed` returns `None` first; a unique-violation at the backend
    /// surfaces as `EngineError::StorageError`, not `AlreadyInitialized`
    /// (that check happens above this layer, see `Generator::initialize`).
    fn init_seed(&mut self, kind: Kind, value: u64) -> Result<(), EngineError>;

    /// Overwrites the current seed for `kind`. Only valid once a row
    /// exists.
    fn set_seed(&mut self, kind: Kind, value: u64) -> Result<(), EngineError>;

    /// Looks up whether `identifier` has already been minted for `kind`,
    /// and if so, when.
    fn find_pid(&mut self, kind: Kind, identifier: &str) -> Result<Option<DateTime<Utc>>, EngineError>;

    /// Records a newly minted identifier. Must fail (surfacing as a
    /// storage error) rather than silently succeed if `(kind, identifier)`
    /// already exists — `Generator::generate` checks with `find_pid`
    /// first precisely so this path is only reached once per identifier.
    fn add_pid(&mut self, kind: Kind, identifier: &str, created_at: DateTime<Utc>) -> Result<(), EngineError>;
}

/// What a transaction closure hands back to `with_transaction`'s caller.
/// `Generator` is the only caller; this exists so the trait object
/// signature in `Store::with_transaction` doesn't need to be generic over
/// an arbitrary return type.
#[derive(Debug, Clone)]
pub enum TxnOutcome {
    Initialized,
    AlreadyInitialized { existing_seed: u64 },
    Minted(pid_domain::Pid),
    Duplicate {
        used_seed: u64,
        next_seed: u64,
        identifier: String,
        created_at: DateTime<Utc>,
    },
}
