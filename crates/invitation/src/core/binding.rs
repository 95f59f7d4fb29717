//! Field binding: copies values of the selected side into page text.
//!
//! Each binding names an element by its `data-node-id` and a dot-separated
//! path into the side's JSON. Binding is best-effort per field: a missing
//! value or element is logged and skipped, and the remaining fields are
//! still written.

use std::fmt;

use serde_json::Value;

use super::data::SelectedVariant;
use crate::config::InvitationConfig;
use crate::dom::TextDom;

/// Dot-separated path into a side's JSON, e.g. `hon_le.dia_diem`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// `None` for an empty path or one with an empty segment (`a..b`).
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Text to render for this path.
    ///
    /// `None` when a segment is absent or the value is not a scalar.
    /// Present-but-falsy values (`""`, `0`, `false`) still render.
    pub fn resolve(&self, root: &Value) -> Option<String> {
        let value = self
            .0
            .iter()
            .try_fold(root, |current, segment| current.get(segment.as_str()))?;
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldBinding {
    pub node_id: String,
    pub path: FieldPath,
}

impl FieldBinding {
    pub fn new(node_id: &str, path: &str) -> Option<Self> {
        Some(Self {
            node_id: node_id.to_string(),
            path: FieldPath::parse(path)?,
        })
    }
}

/// What `apply` did, by `data-node-id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingReport {
    pub written: Vec<String>,
    pub missing_values: Vec<String>,
    pub missing_elements: Vec<String>,
}

/// Write every resolvable binding into the page.
///
/// Only text is touched; elements are never added, removed or replaced, so
/// applying twice leaves the same text as applying once.
pub fn apply<D: TextDom>(
    dom: &mut D,
    variant: &SelectedVariant,
    bindings: &[FieldBinding],
) -> BindingReport {
    let mut report = BindingReport::default();
    for binding in bindings {
        let Some(text) = binding.path.resolve(variant.raw()) else {
            log::debug!("No value at '{}' for {}", binding.path, binding.node_id);
            report.missing_values.push(binding.node_id.clone());
            continue;
        };
        match dom.text_slot(&binding.node_id) {
            Ok(slot) => {
                dom.set_text(&slot, &text);
                log::debug!("Updated {} to: {text}", binding.node_id);
                report.written.push(binding.node_id.clone());
            }
            Err(error) => {
                log::warn!("Skipping binding '{}': {error}", binding.path);
                report.missing_elements.push(binding.node_id.clone());
            }
        }
    }
    log::info!(
        "Wedding data applied for: {} ({} of {} fields)",
        variant.variant.name.as_deref().unwrap_or(&variant.side),
        report.written.len(),
        bindings.len()
    );
    report
}

/// Title with its side suffix (`" - Nhà …"`) replaced by `suffix`.
pub fn title_with_suffix(current: &str, suffix: &str) -> String {
    let base = match current.find(" - Nhà") {
        Some(at) => &current[..at],
        None => current,
    };
    format!("{base}{suffix}")
}

/// Bind the resolved side, or leave the page's built-in text alone when
/// resolution found nothing.
pub fn apply_selected<D: TextDom>(
    dom: &mut D,
    variant: Option<&SelectedVariant>,
    config: &InvitationConfig,
) -> Option<BindingReport> {
    let Some(variant) = variant else {
        log::info!("No wedding data; keeping the page's built-in text");
        return None;
    };
    let report = apply(dom, variant, &config.bindings());
    apply_title(dom, variant, config);
    Some(report)
}

/// Point the page title at the selected side.
pub fn apply_title<D: TextDom>(dom: &mut D, variant: &SelectedVariant, config: &InvitationConfig) {
    let title = title_with_suffix(&dom.title(), config.title_suffix_for(&variant.side));
    dom.set_title(&title);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_reject_empty_segments() {
        assert!(FieldPath::parse("").is_none());
        assert!(FieldPath::parse("hon_le.").is_none());
        assert!(FieldPath::parse("hon_le..dia_chi").is_none());
        assert_eq!(
            FieldPath::parse("hon_le.dia_chi").unwrap().to_string(),
            "hon_le.dia_chi"
        );
    }

    #[test]
    fn resolve_walks_nested_objects() {
        let root = json!({ "hon_le": { "dia_chi": "Hà Nội", "so_ban": 30, "con": { "x": 1 } } });
        let path = |p: &str| FieldPath::parse(p).unwrap();
        assert_eq!(path("hon_le.dia_chi").resolve(&root).as_deref(), Some("Hà Nội"));
        assert_eq!(path("hon_le.so_ban").resolve(&root).as_deref(), Some("30"));
        assert_eq!(path("hon_le.con").resolve(&root), None);
        assert_eq!(path("hon_le.khong_co").resolve(&root), None);
        assert_eq!(path("ten_nha.x").resolve(&root), None);
    }

    #[test]
    fn falsy_but_present_values_render() {
        let root = json!({ "a": "", "b": 0, "c": false, "d": null });
        let path = |p: &str| FieldPath::parse(p).unwrap();
        assert_eq!(path("a").resolve(&root).as_deref(), Some(""));
        assert_eq!(path("b").resolve(&root).as_deref(), Some("0"));
        assert_eq!(path("c").resolve(&root).as_deref(), Some("false"));
        assert_eq!(path("d").resolve(&root), None);
    }

    #[test]
    fn title_suffix_is_replaced_not_appended() {
        assert_eq!(
            title_with_suffix("Đám cưới Đại & Linh - Nhà Trai", " - Nhà Gái"),
            "Đám cưới Đại & Linh - Nhà Gái"
        );
        assert_eq!(
            title_with_suffix("Đám cưới Đại & Linh", " - Nhà Trai"),
            "Đám cưới Đại & Linh - Nhà Trai"
        );
    }
}
