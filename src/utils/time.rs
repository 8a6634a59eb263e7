use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A measurement of a monotonically nondecreasing clock, in nanoseconds.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    #[inline]
    pub fn from_nanos(nanos: u64) -> Timestamp {
        Timestamp(nanos)
    }

    #[inline]
    pub fn from_micros(micros: u64) -> Timestamp {
        Timestamp(micros.saturating_mul(1_000))
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Timestamp {
        Timestamp(millis.saturating_mul(1_000_000))
    }

    /// Samples the clock of current host.
    #[inline]
    pub fn now() -> Timestamp {
        crate::application::sys::timestamp()
    }

    #[inline]
    pub fn elapsed(self) -> Duration {
        Self::now() - self
    }

    #[inline]
    pub fn as_nanos(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1_000_000
    }
}

impl std::ops::Sub for Timestamp {
    type Output = Duration;

    /// Clocks provided by some hosts are not strictly monotonic, so a timestamp in the
    /// future yields zero instead of underflowing.
    fn sub(self, rhs: Timestamp) -> Self::Output {
        Duration::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        let nanos = rhs
            .as_secs()
            .saturating_mul(1_000_000_000)
            .saturating_add(u64::from(rhs.subsec_nanos()));

        Timestamp(self.0.saturating_add(nanos))
    }
}
