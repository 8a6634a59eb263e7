use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::errors::*;
use crate::utils::time::Timestamp;

use super::launcher::LaunchState;
use super::lifecycle::{LifecycleListener, LifecycleListenerHandle, LifecycleSystem};
use super::time::FrameClock;

struct ContextData {
    state: Cell<LaunchState>,
    shutdown: Cell<bool>,
    lifecycles: LifecycleSystem,
    clock: RefCell<FrameClock>,
}

/// The state shared between a `Launcher` and the frame routine it registers with the
/// host. Cloning is cheap, every clone refers to the same state.
#[derive(Clone)]
pub struct Context {
    data: Rc<ContextData>,
}

impl Context {
    pub fn new() -> Self {
        Context {
            data: Rc::new(ContextData {
                state: Cell::new(LaunchState::NotStarted),
                shutdown: Cell::new(false),
                lifecycles: LifecycleSystem::new(),
                clock: RefCell::new(FrameClock::new()),
            }),
        }
    }

    #[inline]
    pub fn state(&self) -> LaunchState {
        self.data.state.get()
    }

    /// Moves the launch state forward. Fails without touching anything if the
    /// transition is not allowed.
    pub(crate) fn transition(&self, to: LaunchState) -> Result<()> {
        let from = self.data.state.get();
        if !from.can_transition_to(to) {
            return Err(LaunchError::InvalidTransition(from, to).into());
        }

        debug!("[Launcher] {:?} -> {:?}.", from, to);
        self.data.state.set(to);
        Ok(())
    }

    /// Asks the host to stop invoking the update routine at the end of this frame.
    pub fn shutdown(&self) {
        self.data.shutdown.set(true);
    }

    /// Returns true if we are going to stop at the end of this frame.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.data.shutdown.get()
    }

    #[inline]
    pub fn attach<T>(&self, lis: T) -> LifecycleListenerHandle
    where
        T: LifecycleListener + 'static,
    {
        self.data.lifecycles.attach(lis)
    }

    #[inline]
    pub fn detach(&self, handle: LifecycleListenerHandle) {
        if !self.data.lifecycles.detach(handle) {
            warn!("[Context] Detaching a stale lifecycle listener {:?}.", handle);
        }
    }

    #[inline]
    pub fn lifecycles(&self) -> &LifecycleSystem {
        &self.data.lifecycles
    }

    pub(crate) fn advance_clock(&self, now: Timestamp) {
        self.data.clock.borrow_mut().advance(now);
    }

    /// Gets the number of frames started so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.data.clock.borrow().frame_index()
    }

    /// Gets the duration between the starts of the last two frames.
    #[inline]
    pub fn frame_duration(&self) -> Duration {
        self.data.clock.borrow().frame_duration()
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.data.clock.borrow().fps()
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("state", &self.state())
            .field("shutdown", &self.is_shutdown())
            .field("frame_index", &self.frame_index())
            .finish()
    }
}
