//! A unified launching model across all target platforms.
//!
//! ## Launching
//!
//! An application supplies two routines. The initialization routine runs exactly once,
//! to completion. Then the update routine is registered with the continuous scheduling
//! facility of host, which invokes it once per frame with its own cadence, until the
//! process is terminated or a `shutdown` is requested.
//!
//! ```no_run
//! use frameloop::prelude::*;
//!
//! fn main() {
//!     application::bootstrap(Params::default(), || Ok(()), || {
//!         if application::frame_index() >= 60 {
//!             application::shutdown();
//!         }
//!
//!         Ok(())
//!     });
//! }
//! ```
//!
//! ## Host
//!
//! Hosts implement `Host`. On the web, frames are driven by `requestAnimationFrame` of
//! browser, and the registering call returns immediately. Native processes have no
//! such facility, a loop on the calling thread takes its place and the registering call
//! only returns once the frames stop.
//!
//! ## Lifecycle
//!
//! Systems could `attach` a `LifecycleListener` to get their hooks invoked in a
//! pre-determined order around the update routine of every frame.

pub mod host;
pub mod launcher;
pub mod lifecycle;
pub mod settings;
pub mod sys;
pub mod time;

mod context;

pub mod prelude {
    pub use super::context::Context;
    pub use super::host::{Host, Interval, Tick};
    pub use super::launcher::{LaunchState, Launcher};
    pub use super::lifecycle::{LifecycleListener, LifecycleListenerHandle};
    pub use super::settings::Params;
}

pub use self::context::Context;
pub use self::host::{Host, Interval, Tick};
pub use self::launcher::{LaunchState, Launcher};
pub use self::lifecycle::{LifecycleListener, LifecycleListenerHandle};
pub use self::settings::Params;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use self::ins::{ctx, CTX};
use crate::errors::*;

static LAUNCHED: AtomicBool = AtomicBool::new(false);

/// The entry point of process. Installs the logger, and launches the application with
/// the host facility of current platform.
///
/// Any failure before the frames are taken over by host is fatal, the process exits
/// with status 1.
pub fn bootstrap<I, U>(params: Params, init: I, update: U)
where
    I: FnOnce() -> Result<()>,
    U: FnMut() -> Result<()> + 'static,
{
    sys::init();

    if let Err(err) = run(params, init, update) {
        error!("{}", err);
        for cause in err.iter_causes() {
            error!("  caused by: {}", cause);
        }

        std::process::exit(1);
    }
}

/// Launches the application with the host facility of current platform.
pub fn run<I, U>(params: Params, init: I, update: U) -> Result<()>
where
    I: FnOnce() -> Result<()>,
    U: FnMut() -> Result<()> + 'static,
{
    run_with(sys::SystemHost::new(), params, init, update)
}

/// Launches the application with `host`.
///
/// An application could only be launched once per process. Any further call fails with
/// `LaunchError::AlreadyLaunched`, without invoking `init` or `host`.
pub fn run_with<H, I, U>(host: H, params: Params, init: I, update: U) -> Result<()>
where
    H: Host,
    I: FnOnce() -> Result<()>,
    U: FnMut() -> Result<()> + 'static,
{
    if LAUNCHED.swap(true, Ordering::SeqCst) {
        warn!("[Launcher] Ignores repeated launching of application.");
        return Err(LaunchError::AlreadyLaunched.into());
    }

    let mut launcher = Launcher::new();
    CTX.with(|v| *v.borrow_mut() = Some(launcher.context().clone()));
    launcher.launch(host, params, init, update)
}

/// Returns true if the application has been launched on this thread.
#[inline]
pub fn valid() -> bool {
    CTX.with(|v| v.borrow().is_some())
}

/// Returns the launch state of application, `NotStarted` if not launched on this
/// thread.
#[inline]
pub fn state() -> LaunchState {
    CTX.with(|v| v.borrow().as_ref().map(|ctx| ctx.state()))
        .unwrap_or(LaunchState::NotStarted)
}

/// Stops invoking the update routine at the end of this frame.
#[inline]
pub fn shutdown() {
    ctx().shutdown()
}

/// Returns true if we are going to stop at the end of this frame.
#[inline]
pub fn is_shutdown() -> bool {
    ctx().is_shutdown()
}

/// Adds a lifecycle listener. It will be invoked since next frame.
#[inline]
pub fn attach<T>(lis: T) -> LifecycleListenerHandle
where
    T: LifecycleListener + 'static,
{
    ctx().attach(lis)
}

/// Removes a lifecycle listener.
#[inline]
pub fn detach(handle: LifecycleListenerHandle) {
    ctx().detach(handle)
}

/// Gets the number of frames started so far.
#[inline]
pub fn frame_index() -> u64 {
    ctx().frame_index()
}

/// Gets the duration between the starts of the last two frames.
#[inline]
pub fn frame_duration() -> Duration {
    ctx().frame_duration()
}

/// Gets current fps.
#[inline]
pub fn fps() -> u32 {
    ctx().fps()
}

mod ins {
    use std::cell::RefCell;

    use super::context::Context;

    thread_local! {
        pub static CTX: RefCell<Option<Context>> = RefCell::new(None);
    }

    #[inline]
    pub fn ctx() -> Context {
        CTX.with(|v| v.borrow().clone())
            .expect("application has not been launched properly.")
    }
}
