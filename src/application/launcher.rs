use crate::errors::*;
use crate::utils::time::Timestamp;

use super::context::Context;
use super::host::{Host, Tick};
use super::settings::Params;

/// The stages a launch goes through. There is no way back to `NotStarted`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LaunchState {
    NotStarted,
    /// The initialization routine is running.
    Initializing,
    /// The update routine has been handed to host. Terminal from the launcher's view.
    Scheduled,
    /// Initialization or registration failed. Nothing will ever be scheduled.
    Failed,
}

impl LaunchState {
    pub fn can_transition_to(self, to: LaunchState) -> bool {
        match (self, to) {
            (LaunchState::NotStarted, LaunchState::Initializing) => true,
            (LaunchState::Initializing, LaunchState::Scheduled) => true,
            (LaunchState::Initializing, LaunchState::Failed) => true,
            (LaunchState::Scheduled, LaunchState::Failed) => true,
            _ => false,
        }
    }
}

impl Default for LaunchState {
    fn default() -> Self {
        LaunchState::NotStarted
    }
}

/// The launcher runs the initialization routine of application once, and then hands
/// its update routine over to the host.
#[derive(Debug, Default)]
pub struct Launcher {
    ctx: Context,
}

impl Launcher {
    pub fn new() -> Self {
        Launcher {
            ctx: Context::new(),
        }
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    #[inline]
    pub fn state(&self) -> LaunchState {
        self.ctx.state()
    }

    /// Invokes `init` to completion, then registers `update` with `host` exactly once.
    ///
    /// Nothing gets registered if `init` fails, the error is returned with
    /// `LaunchError::Initialization` as its context. Launching twice fails with
    /// `LaunchError::AlreadyLaunched` and leaves everything untouched.
    ///
    /// Whether this returns while frames are still being produced depends on the host,
    /// a native host keeps the calling thread until the loop stops.
    pub fn launch<H, I, U>(&mut self, mut host: H, params: Params, init: I, update: U) -> Result<()>
    where
        H: Host,
        I: FnOnce() -> Result<()>,
        U: FnMut() -> Result<()> + 'static,
    {
        if self.ctx.state() != LaunchState::NotStarted {
            return Err(LaunchError::AlreadyLaunched.into());
        }

        self.ctx.transition(LaunchState::Initializing)?;
        info!("[Launcher] Initializing application.");

        if let Err(err) = init() {
            self.ctx.transition(LaunchState::Failed)?;
            return Err(err.context(LaunchError::Initialization).into());
        }

        self.ctx.transition(LaunchState::Scheduled)?;
        info!(
            "[Launcher] Scheduling application with {} cadence (keep_alive: {}).",
            params.interval, params.keep_alive
        );

        let tick = Self::tick(self.ctx.clone(), update);
        if let Err(err) = host.register(tick, params.interval, params.keep_alive) {
            if let Some(LaunchError::HostUnavailable(_)) = launch_error(&err) {
                self.ctx.transition(LaunchState::Failed)?;
            }

            return Err(err);
        }

        Ok(())
    }

    fn tick<U>(ctx: Context, mut update: U) -> Tick
    where
        U: FnMut() -> Result<()> + 'static,
    {
        let finished_ctx = ctx.clone();

        let advance = move || -> Result<bool> {
            if ctx.state() != LaunchState::Scheduled {
                return Err(LaunchError::NotScheduled.into());
            }

            if ctx.is_shutdown() {
                return Ok(false);
            }

            ctx.advance_clock(Timestamp::now());

            ctx.lifecycles().foreach(|v| v.on_pre_update())?;
            update()?;
            ctx.lifecycles().foreach(|v| v.on_update())?;
            ctx.lifecycles().foreach(|v| v.on_post_update())?;

            Ok(!ctx.is_shutdown())
        };

        let finished = move || -> Result<()> {
            info!(
                "[Launcher] Application stopped after {} frames.",
                finished_ctx.frame_index()
            );

            finished_ctx.lifecycles().foreach_rev(|v| v.on_exit())
        };

        Tick::new(advance, finished)
    }
}
