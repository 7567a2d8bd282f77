use std::fmt;

use serde::{Deserialize, Serialize};

/// The two identifier families the engine knows how to mint.
///
/// `Kind` is the tag threaded through every Store and Generator operation:
/// it selects the seed namespace (one `Seed` row per kind) and the encoding
/// rules the encoder applies to a seed. Adding a third kind means adding a
/// variant here and a matching arm in `pid_core::encoder` — no dynamic
/// dispatch, no trait objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Doi,
    Urn,
}

impl Kind {
    /// Stable tag used as the `type` column value and in log lines; never
    /// changes across versions since it's part of the persisted schema.
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Doi => "DOI",
            Kind::Urn => "URN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DOI" => Some(Kind::Doi),
            "URN" => Some(Kind::Urn),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
