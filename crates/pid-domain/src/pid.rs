use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::Kind;

/// A minted identifier, as returned to the caller of `generate`.
///
/// This is a value, not a handle: once minted it has no further lifecycle
/// with the engine (see `Minted`'s append-only invariant in the data
/// model). Derives `Serialize`/`Deserialize` so a host embedding this
/// engine (an HTTP layer, a CLI, an audit log) can pass it through
/// without writing its own DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pid {
    pub kind: Kind,
    pub identifier: String,
    pub seed: u64,
    pub created_at: DateTime<Utc>,
}
