//! Launches a trivial application, used to check the process-level behaviors.
//!
//! USAGE: frameloop [--config <file>] [--interval <ms>] [--frames <n>] [--fail-init]
//!                  [--fail-update] [--bootstrap-twice]

#[cfg(not(target_arch = "wasm32"))]
#[macro_use]
extern crate log;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use frameloop::prelude::*;

    let matches = clap::App::new("frameloop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Initializes once, then updates every frame until stopped")
        .arg(
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Loads launch params from a json file"),
        )
        .arg(
            clap::Arg::with_name("interval")
                .short("i")
                .long("interval")
                .takes_value(true)
                .help("Milliseconds between frames, 0 for the natural cadence of host"),
        )
        .arg(
            clap::Arg::with_name("frames")
                .short("n")
                .long("frames")
                .takes_value(true)
                .help("Stops after the specified number of frames, runs forever if absent"),
        )
        .arg(
            clap::Arg::with_name("fail-init")
                .long("fail-init")
                .help("Makes the initialization routine fail"),
        )
        .arg(
            clap::Arg::with_name("fail-update")
                .long("fail-update")
                .help("Makes the update routine fail on the first frame"),
        )
        .arg(
            clap::Arg::with_name("bootstrap-twice")
                .long("bootstrap-twice")
                .requires("frames")
                .help("Bootstraps the application again after the first launch stopped"),
        )
        .get_matches();

    let mut params = match matches.value_of("config") {
        Some(path) => Params::load(path).unwrap_or_else(|err| fatal(err)),
        None => Params::default(),
    };

    if let Some(v) = matches.value_of("interval") {
        let millis: u32 = v.parse().unwrap_or_else(|err| fatal(err));
        params.interval = Interval::from(millis);
    }

    let options = Options {
        frames: matches
            .value_of("frames")
            .map(|v| v.parse().unwrap_or_else(|err| fatal(err))),
        fail_init: matches.is_present("fail-init"),
        fail_update: matches.is_present("fail-update"),
    };

    let (init, update) = routines(options);
    application::bootstrap(params, init, update);

    if matches.is_present("bootstrap-twice") {
        // Repeated launching is rejected, this ends the process with an error.
        let (init, update) = routines(options);
        application::bootstrap(params, init, update);
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
struct Options {
    frames: Option<u64>,
    fail_init: bool,
    fail_update: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn routines(
    options: Options,
) -> (
    impl FnOnce() -> frameloop::errors::Result<()> + 'static,
    impl FnMut() -> frameloop::errors::Result<()> + 'static,
) {
    use std::cell::Cell;
    use std::rc::Rc;

    use frameloop::application;

    let initialized = Rc::new(Cell::new(false));
    let initialized_clone = initialized.clone();

    let init = move || {
        if options.fail_init {
            return Err(failure::err_msg("initialization refused by --fail-init"));
        }

        initialized_clone.set(true);
        println!("initialized");
        Ok(())
    };

    let update = move || {
        if !initialized.get() {
            return Err(failure::err_msg("update invoked before initialization"));
        }

        let index = application::frame_index();
        debug!("frame {}", index);

        if index == 1 {
            println!("first frame");

            if options.fail_update {
                return Err(failure::err_msg("update refused by --fail-update"));
            }
        }

        if let Some(limit) = options.frames {
            if index >= limit {
                application::shutdown();
            }
        }

        Ok(())
    };

    (init, update)
}

#[cfg(not(target_arch = "wasm32"))]
fn fatal<T: std::fmt::Display, R>(err: T) -> R {
    eprintln!("frameloop: {}", err);
    std::process::exit(2)
}

#[cfg(target_arch = "wasm32")]
fn main() {}
