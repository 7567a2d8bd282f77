//! pid-engine
//!
//! The identifier-minting engine as a library: pick a `Kind` (DOI or
//! URN), `initialize` its starting seed once, then `generate` identifiers
//! one at a time, each guaranteed never to repeat and never to be handed
//! out twice.
//!
//! - `pid_core::{Generator, Store, StoreTxn, encoder}` is the
//!   backend-agnostic engine: deterministic encode/advance plus the
//!   transactional orchestration around them.
//! - `pid_domain::{Kind, EngineError, Pid, Clock}` are the pure domain
//!   types every layer shares.
//! - With the `postgres` feature enabled, `pid_persistence` supplies a
//!   `Store` backed by a pooled `PgConnection`, plus the embedded schema
//!   migrations it runs against.
//!
//! This crate has no binary of its own — minting a million identifiers
//! is a library call, not a server.

pub use pid_core::{encoder, store, EncoderConfig, Generator};
pub use pid_domain::{Clock, EngineError, FixedClock, Kind, Pid, SystemClock};

#[cfg(feature = "postgres")]
pub use pid_persistence as persistence;
