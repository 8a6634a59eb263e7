//! Frame counting.

use std::time::Duration;

use crate::utils::time::Timestamp;

/// Records how many frames have been advanced, and how long the last one took.
///
/// The clock only measures, it never waits or clamps. Pacing is up to the host.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_index: u64,
    timestep: Duration,
    last_frame_timepoint: Option<Timestamp>,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock {
            frame_index: 0,
            timestep: Duration::new(0, 0),
            last_frame_timepoint: None,
        }
    }

    /// Marks the start of a new frame at `now`.
    pub fn advance(&mut self, now: Timestamp) {
        if let Some(last) = self.last_frame_timepoint {
            self.timestep = now - last;
        }

        self.last_frame_timepoint = Some(now);
        self.frame_index += 1;
    }

    /// Gets the number of frames started so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Gets the duration between the starts of the last two frames.
    #[inline]
    pub fn frame_duration(&self) -> Duration {
        self.timestep
    }

    /// Gets current fps.
    #[inline]
    pub fn fps(&self) -> u32 {
        let nanos = self.timestep.as_secs() * 1_000_000_000 + u64::from(self.timestep.subsec_nanos());
        if nanos == 0 {
            0
        } else {
            (1_000_000_000 / nanos) as u32
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame_index(), 0);
        assert_eq!(clock.fps(), 0);

        clock.advance(Timestamp::from_millis(100));
        assert_eq!(clock.frame_index(), 1);
        assert_eq!(clock.frame_duration(), Duration::from_millis(0));

        clock.advance(Timestamp::from_millis(120));
        assert_eq!(clock.frame_index(), 2);
        assert_eq!(clock.frame_duration(), Duration::from_millis(20));
        assert_eq!(clock.fps(), 50);

        clock.advance(Timestamp::from_millis(2120));
        assert_eq!(clock.frame_duration(), Duration::from_secs(2));
        assert_eq!(clock.fps(), 0);
    }

    #[test]
    fn sub_millisecond_frames() {
        let mut clock = FrameClock::new();
        clock.advance(Timestamp::from_micros(1_000));
        clock.advance(Timestamp::from_micros(1_250));

        assert_eq!(clock.frame_duration(), Duration::from_micros(250));
        assert_eq!(clock.fps(), 4_000);
    }
}
