use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::application::host::{Host, Interval, Tick};
use crate::errors::*;
use crate::utils::time::Timestamp;

pub fn timestamp() -> Timestamp {
    let ms = web_sys::window()
        .and_then(|v| v.performance())
        .map(|v| v.now())
        .unwrap_or_else(js_sys::Date::now);

    // `performance.now` has sub-millisecond precision, keep the fractional part
    // instead of truncating to whole milliseconds.
    Timestamp::from_nanos((ms * 1_000_000.0) as u64)
}

pub(crate) fn init() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if ::log::set_boxed_logger(Box::new(WebBrowserLogger {})).is_ok() {
        ::log::set_max_level(::log::LevelFilter::Info);
    }
}

type FrameCallback = Closure<dyn FnMut()>;

/// Drives frames with the event loop of browser, `requestAnimationFrame` for the
/// natural cadence and `setTimeout` for fixed ones.
///
/// Registration returns immediately. The callback chain owns itself, so it outlives
/// this host if `keep_alive` is set. Otherwise dropping the host stops the chain.
#[derive(Default)]
pub struct SystemHost {
    cancel: Option<Rc<Cell<bool>>>,
}

impl SystemHost {
    pub fn new() -> Self {
        SystemHost { cancel: None }
    }
}

impl Drop for SystemHost {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.set(true);
        }
    }
}

impl Host for SystemHost {
    fn register(&mut self, tick: Tick, interval: Interval, keep_alive: bool) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| {
            LaunchError::HostUnavailable("there is no window in this context".to_owned())
        })?;

        let cancel = Rc::new(Cell::new(false));
        if !keep_alive {
            self.cancel = Some(cancel.clone());
        }

        let (mut advance, mut finished) = tick.into_inner();
        let closure: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let clone = closure.clone();

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if cancel.get() {
                return;
            }

            match advance() {
                Ok(true) => {
                    if let Some(inner) = clone.borrow().as_ref() {
                        if let Err(err) = schedule(inner, interval) {
                            error!("[SystemHost] Failed to schedule next frame. {}", err);
                        }
                    }
                }
                Ok(false) => {
                    if let Err(err) = finished() {
                        error!("[SystemHost] {}", err);
                    }
                }
                Err(err) => {
                    error!("[SystemHost] Frame failed, stops scheduling. {}", err);
                }
            }
        }) as Box<dyn FnMut()>));

        if window.performance().is_none() {
            warn!("[SystemHost] Performance is unavailable, timestamps fallback to Date.");
        }

        debug!("[SystemHost] Scheduling frames with {} cadence.", interval);

        let first = closure.borrow();
        let inner = first
            .as_ref()
            .ok_or_else(|| LaunchError::HostUnavailable("frame callback is missing".to_owned()))?;

        schedule(inner, interval)
    }
}

fn schedule(callback: &FrameCallback, interval: Interval) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| {
        LaunchError::HostUnavailable("there is no window in this context".to_owned())
    })?;

    let function: &js_sys::Function = callback.as_ref().unchecked_ref();
    let result = match interval {
        Interval::Natural => window.request_animation_frame(function).map(|_| ()),
        Interval::Fixed(_) => window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                function,
                interval.as_timeout(),
            )
            .map(|_| ()),
    };

    result.map_err(|err| {
        LaunchError::HostUnavailable(format!("failed to schedule frame, {:?}", err)).into()
    })
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

struct WebBrowserLogger;

impl ::log::Log for WebBrowserLogger {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        metadata.level() <= ::log::Level::Info
    }

    fn log(&self, record: &::log::Record) {
        if self.enabled(record.metadata()) {
            let filename = record.file().unwrap_or("Unknown");

            log(&format!(
                "{}: {} ({}:{})",
                record.level(),
                record.args(),
                filename,
                record.line().unwrap_or(0)
            ));
        }
    }

    fn flush(&self) {}
}
