//! The contract between the launcher and the host's continuous scheduling facility.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// The cadence a host should invoke the per-frame routine with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Interval {
    /// Use the natural cadence of host, e.g. the refresh rate of display. Hosts receive
    /// this as is and are never handed an arbitrary fixed period in its place.
    Natural,
    /// Invokes the routine once per specified period.
    Fixed(Duration),
}

impl Interval {
    /// Returns the interval in milliseconds, where 0 stands for `Interval::Natural`.
    pub fn as_millis(self) -> u32 {
        match self {
            Interval::Natural => 0,
            Interval::Fixed(period) => {
                let millis = period.as_secs() * 1000 + u64::from(period.subsec_millis());
                std::cmp::max(millis, 1).min(u64::from(std::u32::MAX)) as u32
            }
        }
    }

    /// Returns the delay argument of `setTimeout`, which is a signed 32-bit integer.
    /// Longer periods are clamped instead of wrapping into a negative (immediate) delay.
    pub fn as_timeout(self) -> i32 {
        std::cmp::min(self.as_millis(), std::i32::MAX as u32) as i32
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Natural
    }
}

impl From<u32> for Interval {
    fn from(millis: u32) -> Self {
        if millis == 0 {
            Interval::Natural
        } else {
            Interval::Fixed(Duration::from_millis(u64::from(millis)))
        }
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.as_millis()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Interval::Natural => write!(f, "natural"),
            Interval::Fixed(_) => write!(f, "{}ms", self.as_millis()),
        }
    }
}

/// The routines a host drives after registration.
pub struct Tick {
    advance: Box<dyn FnMut() -> Result<bool>>,
    finished: Box<dyn FnMut() -> Result<()>>,
}

impl Tick {
    pub fn new<F, F2>(advance: F, finished: F2) -> Self
    where
        F: FnMut() -> Result<bool> + 'static,
        F2: FnMut() -> Result<()> + 'static,
    {
        Tick {
            advance: Box::new(advance),
            finished: Box::new(finished),
        }
    }

    /// Runs one frame. Returns false if the host should stop invoking this tick.
    #[inline]
    pub fn advance(&mut self) -> Result<bool> {
        (self.advance)()
    }

    /// Should be called exactly once, after the last `advance`.
    #[inline]
    pub fn finished(&mut self) -> Result<()> {
        (self.finished)()
    }

    /// Splits the tick into its raw closures, for hosts that have to move them into
    /// separate callbacks.
    pub fn into_inner(
        self,
    ) -> (
        Box<dyn FnMut() -> Result<bool>>,
        Box<dyn FnMut() -> Result<()>>,
    ) {
        (self.advance, self.finished)
    }
}

impl fmt::Debug for Tick {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Tick").finish()
    }
}

/// A continuous scheduling facility provided by the host environment.
///
/// Implementations repeatedly invoke `Tick::advance` with their own cadence until it
/// returns `false` (or fails), and then invoke `Tick::finished` once. Registration is
/// performed at most once per launch.
pub trait Host {
    /// Registers `tick` with the host.
    ///
    /// `interval` must be honored as is, `Interval::Natural` asks for the natural cadence
    /// of host. If `keep_alive` is set, the host must not terminate the process after
    /// this call returns.
    ///
    /// Failing to provide the facility should be reported as
    /// `LaunchError::HostUnavailable`.
    fn register(&mut self, tick: Tick, interval: Interval, keep_alive: bool) -> Result<()>;
}

impl<'a, T: Host + ?Sized> Host for &'a mut T {
    fn register(&mut self, tick: Tick, interval: Interval, keep_alive: bool) -> Result<()> {
        (**self).register(tick, interval, keep_alive)
    }
}

impl<T: Host + ?Sized> Host for Box<T> {
    fn register(&mut self, tick: Tick, interval: Interval, keep_alive: bool) -> Result<()> {
        (**self).register(tick, interval, keep_alive)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_is_zero() {
        assert_eq!(Interval::from(0), Interval::Natural);
        assert_eq!(Interval::Natural.as_millis(), 0);
        assert_eq!(u32::from(Interval::default()), 0);
    }

    #[test]
    fn fixed() {
        let interval = Interval::from(16);
        assert_eq!(interval, Interval::Fixed(Duration::from_millis(16)));
        assert_eq!(interval.as_millis(), 16);
        assert_eq!(interval.to_string(), "16ms");

        // Sub-millisecond periods must not collapse into the natural sentinel.
        let interval = Interval::Fixed(Duration::from_micros(200));
        assert_eq!(interval.as_millis(), 1);
    }

    #[test]
    fn timeout_is_clamped() {
        assert_eq!(Interval::Natural.as_timeout(), 0);
        assert_eq!(Interval::from(16).as_timeout(), 16);

        let interval = Interval::Fixed(Duration::from_secs(u64::from(std::u32::MAX)));
        assert_eq!(interval.as_millis(), std::u32::MAX);
        assert_eq!(interval.as_timeout(), std::i32::MAX);

        let interval = Interval::from(std::i32::MAX as u32 + 1);
        assert_eq!(interval.as_timeout(), std::i32::MAX);
    }

    #[test]
    fn tick() {
        let mut frames = 0;
        let mut tick = Tick::new(
            move || {
                frames += 1;
                Ok(frames < 2)
            },
            || Ok(()),
        );

        assert_eq!(tick.advance().unwrap(), true);
        assert_eq!(tick.advance().unwrap(), false);
        tick.finished().unwrap();
    }
}
