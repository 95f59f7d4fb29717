use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::dom::{describe, window};
use crate::core::data::WeddingDocument;
use crate::error::{InvitationError, Result};

/// GET `url` and return the body text.
pub async fn fetch_text(url: &str) -> Result<String> {
    let fetch_error = |value: wasm_bindgen::JsValue| {
        InvitationError::Fetch(format!("{url}: {}", describe(&value)))
    };
    let response = JsFuture::from(window()?.fetch_with_str(url))
        .await
        .map_err(fetch_error)?;
    let response: Response = response.dyn_into().map_err(fetch_error)?;
    if !response.ok() {
        return Err(InvitationError::Fetch(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let text = JsFuture::from(response.text().map_err(fetch_error)?)
        .await
        .map_err(fetch_error)?;
    text.as_string()
        .ok_or_else(|| InvitationError::Fetch(format!("{url}: body is not text")))
}

pub async fn fetch_document(url: &str) -> Result<WeddingDocument> {
    let text = fetch_text(url).await?;
    WeddingDocument::from_json(&text)
}
