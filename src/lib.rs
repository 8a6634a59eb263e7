//! # What is This?
//!
//! `frameloop` bootstraps an application on its host. It runs the initialization
//! routine of application exactly once, and then hands the per-frame update routine to
//! the continuous scheduling facility of host, e.g. `requestAnimationFrame` of browsers.
//!
//! Check the `application` module for details.

#[macro_use]
pub extern crate failure;
#[macro_use]
pub extern crate log;
pub extern crate serde;

#[macro_use]
pub mod errors;
#[macro_use]
pub mod utils;
pub mod application;
pub mod prelude;
