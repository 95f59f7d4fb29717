//! Wedding data document and side resolution.
//!
//! The data file is one JSON object keyed by side (`chu_re`, `co_dau`, ...)
//! plus a `mac_dinh` key naming the default side:
//!
//! ```json
//! {
//!   "mac_dinh": "chu_re",
//!   "chu_re": {
//!     "ten_nha": "Nhà Trai",
//!     "hon_le": { "dia_diem": "...", "ngay_cuoi": "28.12.2025", "link_chi_duong": "..." },
//!     "ngan_hang": { "bank_id": "VPB", "account_no": "...", "account_name": "..." }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{InvitationError, Result};

/// Top-level key naming the document's default side.
pub const DEFAULT_SIDE_KEY: &str = "mac_dinh";

/// One side's content bundle. Immutable once selected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeddingVariant {
    #[serde(rename = "ten_nha", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "hon_le", default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(rename = "ngan_hang", default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankAccount>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(rename = "dia_diem", default)]
    pub place: Option<String>,
    #[serde(rename = "dia_chi", default)]
    pub address: Option<String>,
    #[serde(rename = "ngay_cuoi", default)]
    pub date: Option<String>,
    #[serde(rename = "gio_cuoi", default)]
    pub time: Option<String>,
    #[serde(rename = "link_chi_duong", default)]
    pub map_link: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccount {
    pub bank_id: String,
    pub bank_name: String,
    pub account_no: String,
    pub account_name: String,
    #[serde(rename = "description")]
    pub note: String,
}

/// How the selected side was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Requested,
    DocumentDefault,
    Fallback,
}

/// The side chosen for this page load.
///
/// Keeps the raw JSON next to the typed view so field bindings can reach
/// keys the typed view does not model.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedVariant {
    pub side: String,
    pub selection: Selection,
    pub variant: WeddingVariant,
    raw: Value,
}

impl SelectedVariant {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn venue(&self) -> Option<&Venue> {
        self.variant.venue.as_ref()
    }

    pub fn bank(&self) -> Option<&BankAccount> {
        self.variant.bank.as_ref()
    }

    /// Map link of the venue, if the side declares a non-empty one.
    pub fn map_link(&self) -> Option<&str> {
        self.venue()
            .and_then(|venue| venue.map_link.as_deref())
            .filter(|link| !link.is_empty())
    }
}

/// Parsed data document.
#[derive(Clone, Debug)]
pub struct WeddingDocument {
    root: Map<String, Value>,
}

impl WeddingDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(InvitationError::Decode(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// The whole document, e.g. for reading setting overrides.
    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn default_side(&self) -> Option<&str> {
        self.root
            .get(DEFAULT_SIDE_KEY)
            .and_then(Value::as_str)
            .filter(|side| !side.is_empty())
    }

    /// Pick the side to render.
    ///
    /// Tries the requested side, then the document default, then
    /// `fallback_side`. A candidate counts only if it is an object shaped
    /// like [`WeddingVariant`].
    pub fn resolve(&self, requested: Option<&str>, fallback_side: &str) -> Result<SelectedVariant> {
        let requested = requested.filter(|side| !side.is_empty());
        let candidates = [
            (requested, Selection::Requested),
            (self.default_side(), Selection::DocumentDefault),
            (Some(fallback_side), Selection::Fallback),
        ];

        let mut tried: Vec<String> = Vec::new();
        for (side, selection) in candidates {
            let Some(side) = side else { continue };
            if tried.iter().any(|t| t == side) {
                continue;
            }
            tried.push(side.to_string());
            match self.variant(side) {
                Some(Ok((variant, raw))) => {
                    log::info!("Loaded wedding data for: {side} ({selection:?})");
                    return Ok(SelectedVariant {
                        side: side.to_string(),
                        selection,
                        variant,
                        raw,
                    });
                }
                Some(Err(error)) => log::warn!("Side '{side}' is malformed: {error}"),
                None => log::debug!("Side '{side}' not found in wedding data"),
            }
        }

        Err(InvitationError::DataUnavailable {
            requested: requested.map(str::to_string),
            tried,
        })
    }

    fn variant(&self, side: &str) -> Option<Result<(WeddingVariant, Value)>> {
        let raw = self.root.get(side)?;
        if !raw.is_object() {
            return Some(Err(InvitationError::Decode(format!(
                "side '{side}' is {}, not an object",
                json_kind(raw)
            ))));
        }
        Some(
            WeddingVariant::deserialize(raw)
                .map(|variant| (variant, raw.clone()))
                .map_err(InvitationError::from),
        )
    }
}

/// Read the side selector from a URL query string (`?type=co_dau`).
///
/// Like `URLSearchParams::get`, the first occurrence wins and `+` decodes to
/// a space. Empty values count as absent.
pub fn selector_from_query(search: &str, key: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(name, _)| decode_component(name) == key)
        .map(|(_, value)| decode_component(value))
        .filter(|value| !value.is_empty())
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> WeddingDocument {
        WeddingDocument::from_value(json!({
            "mac_dinh": "co_dau",
            "chu_re": {
                "ten_nha": "Nhà Trai",
                "hon_le": { "dia_diem": "Tư gia nhà trai", "link_chi_duong": "https://maps.app.goo.gl/abc" },
                "ngan_hang": { "bank_id": "VPB", "account_no": "123", "account_name": "A", "description": "Mung cuoi" }
            },
            "co_dau": { "ten_nha": "Nhà Gái" }
        }))
        .unwrap()
    }

    #[test]
    fn requested_side_wins() {
        let selected = document().resolve(Some("chu_re"), "chu_re").unwrap();
        assert_eq!(selected.side, "chu_re");
        assert_eq!(selected.selection, Selection::Requested);
        assert_eq!(selected.variant.name.as_deref(), Some("Nhà Trai"));
        assert_eq!(selected.bank().map(|bank| bank.note.as_str()), Some("Mung cuoi"));
        assert_eq!(selected.map_link(), Some("https://maps.app.goo.gl/abc"));
    }

    #[test]
    fn unknown_side_falls_back_to_document_default() {
        let selected = document().resolve(Some("ban_be"), "chu_re").unwrap();
        assert_eq!(selected.side, "co_dau");
        assert_eq!(selected.selection, Selection::DocumentDefault);
    }

    #[test]
    fn missing_default_falls_back_to_fallback_side() {
        let document = WeddingDocument::from_value(json!({
            "mac_dinh": "ho_hang",
            "chu_re": { "ten_nha": "Nhà Trai" }
        }))
        .unwrap();
        let selected = document.resolve(None, "chu_re").unwrap();
        assert_eq!(selected.side, "chu_re");
        assert_eq!(selected.selection, Selection::Fallback);
    }

    #[test]
    fn nothing_to_resolve_is_data_unavailable() {
        let document = WeddingDocument::from_value(json!({ "mac_dinh": "co_dau" })).unwrap();
        let error = document.resolve(Some("ban_be"), "chu_re").unwrap_err();
        assert_eq!(
            error,
            InvitationError::DataUnavailable {
                requested: Some("ban_be".to_string()),
                tried: vec!["ban_be".to_string(), "co_dau".to_string(), "chu_re".to_string()],
            }
        );
    }

    #[test]
    fn non_object_side_is_skipped() {
        // `mac_dinh` itself is a string, so requesting it must not select it.
        let selected = document().resolve(Some("mac_dinh"), "chu_re").unwrap();
        assert_eq!(selected.side, "co_dau");
    }

    #[test]
    fn top_level_array_is_rejected() {
        assert!(matches!(
            WeddingDocument::from_json("[1, 2]"),
            Err(InvitationError::Decode(_))
        ));
    }

    #[test]
    fn selector_is_read_from_query_string() {
        assert_eq!(selector_from_query("?type=co_dau", "type").as_deref(), Some("co_dau"));
        assert_eq!(
            selector_from_query("?debug=1&type=co%5Fdau&type=chu_re", "type").as_deref(),
            Some("co_dau")
        );
        assert_eq!(selector_from_query("?type=", "type"), None);
        assert_eq!(selector_from_query("", "type"), None);
        assert_eq!(selector_from_query("?name=a+b", "name").as_deref(), Some("a b"));
    }
}
