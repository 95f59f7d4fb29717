//! Page settings.
//!
//! Every constant the page depends on lives in [`InvitationConfig`]. The data
//! document may override any of them through an optional top-level
//! `cau_hinh` object; missing keys keep their defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::binding::FieldBinding;
use crate::core::data::BankAccount;
use crate::error::{InvitationError, Result};

pub const DEFAULT_DATA_URL: &str = "data.json";
pub const DEFAULT_SELECTOR_KEY: &str = "type";
/// Groom's side; used when neither the URL nor the document picks a side.
pub const FALLBACK_SIDE: &str = "chu_re";
pub const BRIDE_SIDE: &str = "co_dau";
pub const APPROVED_HOST_PREFIX: &str = "https://res.cloudinary.com";
pub const QUALITY_TRANSFORM: &str = "q_auto:best,f_auto";
pub const PLACEHOLDER_WIDTH: u32 = 4000;
pub const PLACEHOLDER_HEIGHT: u32 = 3000;
pub const WEDDING_AT: &str = "2025-12-28T16:00:00+07:00";
pub const QR_SERVICE_BASE: &str = "https://img.vietqr.io/image";
pub const QR_TEMPLATE: &str = "compact2";
pub const DEFAULT_MAP_URL: &str = "https://maps.google.com";

/// Top-level data document key holding setting overrides.
pub const OVERRIDES_KEY: &str = "cau_hinh";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationConfig {
    pub data_url: String,
    /// Query parameter selecting the side, e.g. `?type=co_dau`.
    pub selector_key: String,
    pub fallback_side: String,
    pub bride_side: String,
    pub approved_host_prefix: String,
    pub quality_transform: String,
    pub placeholder_width: u32,
    pub placeholder_height: u32,
    /// RFC 3339 instant the countdown runs toward.
    pub wedding_at: String,
    pub countdown_tick_ms: u32,
    pub carousel_interval_ms: u32,
    pub carousel_resume_delay_ms: u32,
    /// Delay before the second initialization attempt after a lifecycle signal.
    pub settle_delay_ms: u32,
    /// How long components wait for the data document before starting anyway.
    pub data_wait_ms: u32,
    pub audio_volume: f64,
    pub qr_service_base: String,
    pub qr_template: String,
    pub default_map_url: String,
    pub fallback_bank: BankAccount,
    /// `data-node-id` -> dot-separated path into the selected side.
    pub field_bindings: IndexMap<String, String>,
    pub title_suffix_bride: String,
    pub title_suffix_groom: String,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        let field_bindings = [
            ("hkBC0wNsbm", "ten_nha"),
            ("venue_dia_diem", "hon_le.dia_diem"),
            ("venue_dia_chi", "hon_le.dia_chi"),
            ("venue_ngay_cuoi", "hon_le.ngay_cuoi"),
            ("venue_gio_cuoi", "hon_le.gio_cuoi"),
        ]
        .into_iter()
        .map(|(node_id, path)| (node_id.to_string(), path.to_string()))
        .collect();

        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            selector_key: DEFAULT_SELECTOR_KEY.to_string(),
            fallback_side: FALLBACK_SIDE.to_string(),
            bride_side: BRIDE_SIDE.to_string(),
            approved_host_prefix: APPROVED_HOST_PREFIX.to_string(),
            quality_transform: QUALITY_TRANSFORM.to_string(),
            placeholder_width: PLACEHOLDER_WIDTH,
            placeholder_height: PLACEHOLDER_HEIGHT,
            wedding_at: WEDDING_AT.to_string(),
            countdown_tick_ms: 1000,
            carousel_interval_ms: 3000,
            carousel_resume_delay_ms: 5000,
            settle_delay_ms: 1000,
            data_wait_ms: 4000,
            audio_volume: 0.5,
            qr_service_base: QR_SERVICE_BASE.to_string(),
            qr_template: QR_TEMPLATE.to_string(),
            default_map_url: DEFAULT_MAP_URL.to_string(),
            fallback_bank: BankAccount {
                bank_id: "VPB".to_string(),
                bank_name: "VPBank".to_string(),
                account_no: "99015012001".to_string(),
                account_name: "LE QUANG DAI".to_string(),
                note: "Chuc mung hanh phuc".to_string(),
            },
            field_bindings,
            title_suffix_bride: " - Nhà Gái".to_string(),
            title_suffix_groom: " - Nhà Trai".to_string(),
        }
    }
}

impl InvitationConfig {
    /// Wedding instant as milliseconds since the Unix epoch.
    pub fn wedding_timestamp_ms(&self) -> Result<i64> {
        chrono::DateTime::parse_from_rfc3339(&self.wedding_at)
            .map(|at| at.timestamp_millis())
            .map_err(|error| {
                InvitationError::Decode(format!("wedding_at '{}': {error}", self.wedding_at))
            })
    }

    /// Parsed field bindings in declaration order. Empty paths are dropped.
    pub fn bindings(&self) -> Vec<FieldBinding> {
        self.field_bindings
            .iter()
            .filter_map(|(node_id, path)| FieldBinding::new(node_id, path))
            .collect()
    }

    pub fn title_suffix_for(&self, side: &str) -> &str {
        if side == self.bride_side {
            &self.title_suffix_bride
        } else {
            &self.title_suffix_groom
        }
    }
}

/// Where the active settings came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    /// Overridden by the data document's `cau_hinh` object
    DataDocument,
}

#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub config: InvitationConfig,
    pub source: ConfigSource,
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            config: InvitationConfig::default(),
            source: ConfigSource::Default,
        }
    }
}

/// Read setting overrides from a parsed data document.
///
/// A malformed override object is logged and ignored.
pub fn load_from_document(document: &Value) -> LoadedConfig {
    let Some(overrides) = document.get(OVERRIDES_KEY) else {
        return LoadedConfig::default();
    };
    match InvitationConfig::deserialize(overrides) {
        Ok(config) => {
            log::debug!("Settings overridden by '{OVERRIDES_KEY}'");
            LoadedConfig {
                config,
                source: ConfigSource::DataDocument,
            }
        }
        Err(error) => {
            log::warn!("Ignoring malformed '{OVERRIDES_KEY}': {error}");
            LoadedConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_wedding_instant_is_afternoon_in_vietnam() {
        let config = InvitationConfig::default();
        // 2025-12-28T09:00:00Z
        assert_eq!(config.wedding_timestamp_ms(), Ok(1_766_912_400_000));
    }

    #[test]
    fn bad_wedding_instant_is_a_decode_error() {
        let config = InvitationConfig {
            wedding_at: "28/12/2025".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.wedding_timestamp_ms(),
            Err(InvitationError::Decode(_))
        ));
    }

    #[test]
    fn bindings_keep_declaration_order() {
        let node_ids: Vec<_> = InvitationConfig::default()
            .bindings()
            .into_iter()
            .map(|binding| binding.node_id)
            .collect();
        assert_eq!(
            node_ids,
            [
                "hkBC0wNsbm",
                "venue_dia_diem",
                "venue_dia_chi",
                "venue_ngay_cuoi",
                "venue_gio_cuoi"
            ]
        );
    }

    #[test]
    fn document_without_overrides_uses_defaults() {
        let loaded = load_from_document(&json!({ "mac_dinh": "chu_re" }));
        assert_eq!(loaded.source, ConfigSource::Default);
        assert_eq!(loaded.config, InvitationConfig::default());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let loaded = load_from_document(&json!({
            "cau_hinh": { "carousel_interval_ms": 5000, "qr_template": "print" }
        }));
        assert_eq!(loaded.source, ConfigSource::DataDocument);
        assert_eq!(loaded.config.carousel_interval_ms, 5000);
        assert_eq!(loaded.config.qr_template, "print");
        assert_eq!(loaded.config.fallback_side, FALLBACK_SIDE);
        assert_eq!(loaded.config.data_wait_ms, 4000);
    }

    #[test]
    fn malformed_overrides_fall_back_to_defaults() {
        let loaded = load_from_document(&json!({ "cau_hinh": { "countdown_tick_ms": "fast" } }));
        assert_eq!(loaded.source, ConfigSource::Default);
    }

    #[test]
    fn title_suffix_depends_on_side() {
        let config = InvitationConfig::default();
        assert_eq!(config.title_suffix_for("co_dau"), " - Nhà Gái");
        assert_eq!(config.title_suffix_for("chu_re"), " - Nhà Trai");
        assert_eq!(config.title_suffix_for("ban_be"), " - Nhà Trai");
    }
}
