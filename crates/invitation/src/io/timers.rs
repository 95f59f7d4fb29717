//! Interval and one-shot timers on the page's event loop.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use zoon::{Task, Timer};

use super::dom::{js_error, window};
use crate::error::Result;

/// A running `setInterval`. Dropping the handle clears it.
pub struct IntervalHandle {
    interval_id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    pub fn start(interval_ms: u32, tick: impl FnMut() + 'static) -> Result<Self> {
        let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let interval_ms = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        let interval_id = window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                interval_ms,
            )
            .map_err(js_error("setInterval"))?;
        Ok(Self {
            interval_id,
            _closure: closure,
        })
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.interval_id);
        }
    }
}

/// Run `f` once after `delay_ms`.
pub fn after(delay_ms: u32, f: impl FnOnce() + 'static) {
    Task::start(async move {
        Timer::sleep(delay_ms).await;
        f();
    });
}
