use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned row id. Never minted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneId(pub i64);

impl PhoneId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PhoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
