pub use crate::application;
pub use crate::application::prelude::*;
pub use crate::errors::{LaunchError, Result};
pub use crate::utils::time::Timestamp;
