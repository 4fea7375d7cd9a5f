//! Timestamps and the trusted clock capability.
//!
//! Program code never reads the system clock directly. It asks a [`Clock`]
//! handed in by the host, so an unreadable clock is an ordinary error path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Signed seconds since the Unix epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimestamp(i64);

impl UnixTimestamp {
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clock unavailable: {0}")]
pub struct ClockError(pub String);

/// A source of trusted time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<UnixTimestamp, ClockError>;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<UnixTimestamp, ClockError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError(e.to_string()))?
            .as_secs();
        let secs = i64::try_from(secs).map_err(|e| ClockError(e.to_string()))?;
        Ok(UnixTimestamp(secs))
    }
}
