//! pid-domain
//!
//! Pure domain types shared by the rest of the identifier-minting engine:
//! the `Kind` tag selecting encoding rules and seed namespace, the
//! `EngineError` taxonomy every layer boundary returns, and the `Clock`
//! abstraction the generator uses to stamp `Minted` rows.
//!
//! Nothing here talks to a database or does I/O — that's `pid-core`
//! (orchestration) and `pid-persistence` (Postgres backend).

pub mod clock;
pub mod error;
pub mod kind;
pub mod pid;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use kind::Kind;
pub use pid::Pid;
