#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use frameloop::prelude::*;

/// Records everything that happens during a launch, in order.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn note(journal: &Journal, event: &str) {
    journal.borrow_mut().push(event.to_owned());
}

pub fn count(journal: &Journal, event: &str) -> usize {
    journal.borrow().iter().filter(|v| *v == event).count()
}

/// A host that drives a limited number of frames synchronously, inside the
/// registering call.
pub struct MockHost {
    pub ticks: usize,
    pub journal: Journal,
    pub registrations: Rc<RefCell<Vec<(Interval, bool)>>>,
    pub unavailable: bool,
}

impl MockHost {
    pub fn new(ticks: usize, journal: &Journal) -> Self {
        MockHost {
            ticks,
            journal: journal.clone(),
            registrations: Rc::new(RefCell::new(Vec::new())),
            unavailable: false,
        }
    }
}

impl Host for MockHost {
    fn register(&mut self, mut tick: Tick, interval: Interval, keep_alive: bool) -> Result<()> {
        note(&self.journal, "register");

        if self.unavailable {
            return Err(LaunchError::HostUnavailable("mocked".to_owned()).into());
        }

        self.registrations.borrow_mut().push((interval, keep_alive));

        for _ in 0..self.ticks {
            if !tick.advance()? {
                note(&self.journal, "halted");
                return tick.finished();
            }
        }

        Ok(())
    }
}
