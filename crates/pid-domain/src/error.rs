use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::kind::Kind;

/// The full error taxonomy for `initialize`, `generate`, and `exists`.
///
/// Every engine boundary (Store, Generator, Admin ops) returns
/// `Result<T, EngineError>` — no panics, no exceptions-by-another-name.
/// `StorageError` is the one variant that wraps an opaque backend cause
/// rather than carrying structured fields: the engine doesn't know or care
/// which relational backend is underneath, only that it failed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A mint was attempted before `initialize(kind, _)` ever ran.
    #[error("kind {0} has not been initialized")]
    NotInitialized(Kind),

    /// `initialize` was called a second time for a kind that already has a
    /// seed on record. Carries the seed that is actually persisted so the
    /// caller can decide whether that's fine.
    #[error("kind {kind} is already initialized with seed {existing_seed}")]
    AlreadyInitialized { kind: Kind, existing_seed: u64 },

    /// The identifier computed from the current seed already exists in
    /// `Minted`. The seed is deliberately left unadvanced — see the
    /// invariant in the generator's `generate` pipeline.
    #[error("identifier {identifier} for kind {kind} (seed {used_seed}) was already minted at {created_at}")]
    DuplicatePid {
        kind: Kind,
        used_seed: u64,
        next_seed: u64,
        identifier: String,
        created_at: DateTime<Utc>,
    },

    /// Any backend failure, including a serialization conflict between two
    /// concurrent mints. Never retried internally — see module docs on
    /// `pid_core::generator`.
    #[error("storage error: {0}")]
    StorageError(String),
}

impl EngineError {
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        EngineError::StorageError(cause.to_string())
    }
}
