pub use failure::Error;

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;

#[macro_export]
macro_rules! err_format {
    ($e:expr) => {
        $crate::failure::err_msg($e)
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::failure::err_msg(format!($fmt, $($arg)+))
    };
}

use crate::application::LaunchState;

/// The failures recognized by the launching process. Everything here is fatal, there
/// is no retry at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum LaunchError {
    /// The user provided initialization routine reported an error. The original error
    /// is kept as the cause.
    #[fail(display = "Initialization of application failed.")]
    Initialization,
    /// The host could not provide a continuous scheduling facility.
    #[fail(display = "Host scheduling facility is unavailable: {}.", _0)]
    HostUnavailable(String),
    /// The launch routine has been called more than once.
    #[fail(display = "Application has already been launched.")]
    AlreadyLaunched,
    #[fail(display = "Invalid launch state transition from {:?} to {:?}.", _0, _1)]
    InvalidTransition(LaunchState, LaunchState),
    /// The host fired a frame before registration completed.
    #[fail(display = "Frame invoked before the application has been scheduled.")]
    NotScheduled,
}

/// Finds the `LaunchError` carried by `err`, either directly or as the context of
/// another failure.
pub fn launch_error(err: &Error) -> Option<&LaunchError> {
    if let Some(v) = err.downcast_ref::<LaunchError>() {
        return Some(v);
    }

    err.downcast_ref::<::failure::Context<LaunchError>>()
        .map(|v| v.get_context())
}
