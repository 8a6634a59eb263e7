use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use crate::application::host::{Host, Interval, Tick};
use crate::errors::*;
use crate::utils::time::Timestamp;

pub fn timestamp() -> Timestamp {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();

    let duration = ORIGIN.get_or_init(Instant::now).elapsed();
    let nanos = duration
        .as_secs()
        .saturating_mul(1_000_000_000)
        .saturating_add(u64::from(duration.subsec_nanos()));

    Timestamp::from_nanos(nanos)
}

/// Installs the logger. `RUST_LOG` overrides the default `info` level.
pub(crate) fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        debug!("A logger has been installed already.");
    }
}

/// Native processes have no host event loop to call back into us, so this stands in
/// for one: it keeps the calling thread and drives the frames itself.
#[derive(Debug, Default)]
pub struct SystemHost {}

impl SystemHost {
    pub fn new() -> Self {
        SystemHost {}
    }
}

impl Host for SystemHost {
    fn register(&mut self, mut tick: Tick, interval: Interval, keep_alive: bool) -> Result<()> {
        if !keep_alive {
            let err = LaunchError::HostUnavailable(
                "native process ends as soon as the registering call returns, keep_alive is required"
                    .to_owned(),
            );

            return Err(err.into());
        }

        debug!(
            "[SystemHost] Running frames on thread {:?} with {} cadence.",
            thread::current().name().unwrap_or("<unnamed>"),
            interval
        );

        run_forever(&mut tick, interval)
    }
}

/// Advances `tick` until it asks to stop, then finishes it. Errors stop the loop
/// immediately.
pub(crate) fn run_forever(tick: &mut Tick, interval: Interval) -> Result<()> {
    loop {
        let frame_timepoint = Instant::now();
        if !tick.advance()? {
            break;
        }

        wait(frame_timepoint, interval);
    }

    tick.finished()
}

/// Gives up the rest of the frame to the OS scheduler. The natural cadence of a
/// native host is a single yield per frame.
fn wait(frame_timepoint: Instant, interval: Interval) {
    match interval {
        Interval::Natural => thread::yield_now(),
        Interval::Fixed(period) => {
            while frame_timepoint.elapsed() < period {
                if frame_timepoint.elapsed() + Duration::from_millis(2) < period {
                    thread::sleep(Duration::from_millis(1));
                } else {
                    thread::yield_now();
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting(limit: u32, frames: &Rc<Cell<u32>>, finished: &Rc<Cell<bool>>) -> Tick {
        let f1 = frames.clone();
        let f2 = finished.clone();

        Tick::new(
            move || {
                f1.set(f1.get() + 1);
                Ok(f1.get() < limit)
            },
            move || {
                f2.set(true);
                Ok(())
            },
        )
    }

    #[test]
    fn runs_until_stopped() {
        let frames = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(false));

        let mut host = SystemHost::new();
        host.register(counting(5, &frames, &finished), Interval::Natural, true)
            .unwrap();

        assert_eq!(frames.get(), 5);
        assert!(finished.get());
    }

    #[test]
    fn fixed_cadence() {
        let frames = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(false));

        let ts = Instant::now();
        let mut host = SystemHost::new();
        let interval = Interval::Fixed(Duration::from_millis(10));
        host.register(counting(3, &frames, &finished), interval, true)
            .unwrap();

        // The last frame stops the loop before any waiting.
        assert!(ts.elapsed() >= Duration::from_millis(20));
        assert_eq!(frames.get(), 3);
    }

    #[test]
    fn requires_keep_alive() {
        let frames = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(false));

        let mut host = SystemHost::new();
        let err = host
            .register(counting(1, &frames, &finished), Interval::Natural, false)
            .unwrap_err();

        match launch_error(&err) {
            Some(LaunchError::HostUnavailable(_)) => {}
            v => panic!("unexpected error {:?}", v),
        }

        assert_eq!(frames.get(), 0);
        assert!(!finished.get());
    }

    #[test]
    fn errors_stop_the_loop() {
        let finished = Rc::new(Cell::new(false));
        let f2 = finished.clone();

        let mut tick = Tick::new(
            || Err(err_format!("boom")),
            move || {
                f2.set(true);
                Ok(())
            },
        );

        assert!(run_forever(&mut tick, Interval::Natural).is_err());
        assert!(!finished.get());
    }
}
