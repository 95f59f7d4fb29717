//! SweetAlert2 modal.

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use super::dom::{js_error, window};
use crate::core::widgets::payment::PopupOptions;
use crate::error::{InvitationError, Result};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Swal, js_name = fire, catch)]
    fn swal_fire(options: &JsValue) -> std::result::Result<JsValue, JsValue>;
}

/// Whether the host page loaded the popup library.
pub fn is_available() -> bool {
    window()
        .ok()
        .and_then(|window| js_sys::Reflect::has(&window, &JsValue::from_str("Swal")).ok())
        .unwrap_or(false)
}

pub fn show(options: &PopupOptions) -> Result<()> {
    if !is_available() {
        return Err(InvitationError::element_not_found("window.Swal"));
    }
    let options = serde_wasm_bindgen::to_value(options)
        .map_err(|error| InvitationError::Decode(error.to_string()))?;
    swal_fire(&options).map_err(js_error("Swal.fire"))?;
    Ok(())
}

/// Show `options`, logging instead of failing.
pub fn show_or_log(options: &PopupOptions) {
    if let Err(error) = show(options) {
        log::warn!("Popup not shown: {error}");
    }
}
