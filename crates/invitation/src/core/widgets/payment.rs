//! Bank-transfer QR popup and venue directions.
//!
//! The QR image comes from an external service addressed by bank id,
//! account number and template, with optional `amount`, `addInfo` and
//! `accountName` query parameters. The popup library renders the HTML built
//! here; values are escaped before they reach it.

use serde::Serialize;

use crate::config::InvitationConfig;
use crate::core::data::{BankAccount, SelectedVariant};

pub const QR_BOX_TITLE: &str = "💝 Mừng Cưới 💝";
pub const GIFT_TITLE: &str = "💝 Gửi Quà Mừng Cưới 💝";
pub const GIFT_DEFAULT_NOTE: &str = "Mung cuoi";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentDetails {
    pub bank_id: String,
    pub bank_name: String,
    pub account_no: String,
    pub account_name: String,
    pub description: String,
    pub amount: String,
    pub template: String,
}

impl PaymentDetails {
    /// The selected side's bank account, else the configured fallback.
    pub fn for_variant(variant: Option<&SelectedVariant>, config: &InvitationConfig) -> Self {
        let bank = match variant.and_then(SelectedVariant::bank) {
            Some(bank) => bank,
            None => {
                log::debug!("No bank info in wedding data; using fallback account");
                &config.fallback_bank
            }
        };
        Self::from_account(bank, config)
    }

    fn from_account(bank: &BankAccount, config: &InvitationConfig) -> Self {
        Self {
            bank_id: bank.bank_id.clone(),
            bank_name: bank.bank_name.clone(),
            account_no: bank.account_no.clone(),
            account_name: bank.account_name.clone(),
            description: bank.note.clone(),
            amount: String::new(),
            template: config.qr_template.clone(),
        }
    }

    /// QR image URL; empty optional fields are left out.
    pub fn qr_url(&self, service_base: &str) -> String {
        let params = [
            ("amount", self.amount.as_str()),
            ("addInfo", self.description.as_str()),
            ("accountName", self.account_name.as_str()),
        ];
        self.url_with(service_base, &params)
    }

    /// QR image URL for the toolbar gift button, which always carries a
    /// transfer note and the account holder.
    pub fn gift_qr_url(&self, service_base: &str) -> String {
        let note = if self.description.is_empty() {
            GIFT_DEFAULT_NOTE
        } else {
            self.description.as_str()
        };
        let mut url = self.image_path(service_base);
        url.push_str(&format!("?addInfo={}", urlencoding::encode(note)));
        url.push_str(&format!("&accountName={}", urlencoding::encode(&self.account_name)));
        url
    }

    fn image_path(&self, service_base: &str) -> String {
        format!(
            "{}/{}-{}-{}.png",
            service_base.trim_end_matches('/'),
            self.bank_id,
            self.account_no,
            self.template
        )
    }

    fn url_with(&self, service_base: &str, params: &[(&str, &str)]) -> String {
        let query: Vec<String> = params
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect();
        let mut url = self.image_path(service_base);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// Bank name, or the bank id when the name is unknown.
    pub fn bank_label(&self) -> &str {
        if self.bank_name.is_empty() {
            &self.bank_id
        } else {
            &self.bank_name
        }
    }
}

/// Content handed to the popup library. Field names follow its options API.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub title: String,
    pub html: String,
    pub show_close_button: bool,
    pub show_confirm_button: bool,
    pub width: String,
    pub padding: String,
    pub background: String,
    pub custom_class: PopupClasses,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PopupClasses {
    pub popup: String,
}

impl PopupOptions {
    pub fn payment(title: &str, details: &PaymentDetails, qr_url: &str) -> Self {
        let html = format!(
            r#"<div style="text-align: center;">
    <img src="{qr}" alt="VietQR" style="max-width: 100%; height: auto; border-radius: 8px; margin-bottom: 15px;">
    <div style="background: #f8f9fa; padding: 15px; border-radius: 8px; text-align: left;">
        <p style="margin: 5px 0;"><strong>Ngân hàng:</strong> {bank}</p>
        <p style="margin: 5px 0;"><strong>Số TK:</strong> {account_no}</p>
        <p style="margin: 5px 0;"><strong>Chủ TK:</strong> {account_name}</p>
    </div>
    <p style="margin-top: 15px; color: #666; font-size: 14px;">Quét mã QR để chuyển khoản 💕</p>
</div>"#,
            qr = escape_html(qr_url),
            bank = escape_html(details.bank_label()),
            account_no = escape_html(&details.account_no),
            account_name = escape_html(&details.account_name),
        );
        Self {
            title: title.to_string(),
            html,
            show_close_button: true,
            show_confirm_button: false,
            width: "auto".to_string(),
            padding: "20px".to_string(),
            background: "#fff".to_string(),
            custom_class: PopupClasses {
                popup: "qr-popup".to_string(),
            },
        }
    }
}

/// Map link of the selected side, else the configured default.
pub fn directions_url<'a>(variant: Option<&'a SelectedVariant>, config: &'a InvitationConfig) -> &'a str {
    variant
        .and_then(SelectedVariant::map_link)
        .unwrap_or(&config.default_map_url)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::WeddingDocument;
    use serde_json::json;

    const BASE: &str = "https://img.vietqr.io/image";

    fn fallback() -> PaymentDetails {
        PaymentDetails::for_variant(None, &InvitationConfig::default())
    }

    #[test]
    fn fallback_account_is_used_without_data() {
        let details = fallback();
        assert_eq!(details.bank_id, "VPB");
        assert_eq!(details.account_no, "99015012001");
        assert_eq!(details.template, "compact2");
    }

    #[test]
    fn qr_url_encodes_optional_parameters() {
        assert_eq!(
            fallback().qr_url(BASE),
            "https://img.vietqr.io/image/VPB-99015012001-compact2.png\
             ?addInfo=Chuc%20mung%20hanh%20phuc&accountName=LE%20QUANG%20DAI"
        );
    }

    #[test]
    fn qr_url_skips_empty_parameters() {
        let details = PaymentDetails {
            description: String::new(),
            account_name: String::new(),
            ..fallback()
        };
        assert_eq!(
            details.qr_url(BASE),
            "https://img.vietqr.io/image/VPB-99015012001-compact2.png"
        );
        let with_amount = PaymentDetails {
            amount: "500000".to_string(),
            ..details
        };
        assert_eq!(
            with_amount.qr_url(BASE),
            "https://img.vietqr.io/image/VPB-99015012001-compact2.png?amount=500000"
        );
    }

    #[test]
    fn gift_url_always_has_note_and_holder() {
        let details = PaymentDetails {
            description: String::new(),
            ..fallback()
        };
        assert_eq!(
            details.gift_qr_url(BASE),
            "https://img.vietqr.io/image/VPB-99015012001-compact2.png\
             ?addInfo=Mung%20cuoi&accountName=LE%20QUANG%20DAI"
        );
    }

    #[test]
    fn variant_bank_overrides_fallback() {
        let document = WeddingDocument::from_value(json!({
            "co_dau": {
                "ngan_hang": { "bank_id": "TCB", "account_no": "1903", "account_name": "NGUYEN THI LINH" },
                "hon_le": { "link_chi_duong": "https://maps.app.goo.gl/xyz" }
            }
        }))
        .unwrap();
        let config = InvitationConfig::default();
        let selected = document.resolve(Some("co_dau"), "chu_re").unwrap();
        let details = PaymentDetails::for_variant(Some(&selected), &config);
        assert_eq!(details.bank_label(), "TCB");
        assert_eq!(details.description, "");
        assert_eq!(directions_url(Some(&selected), &config), "https://maps.app.goo.gl/xyz");
        assert_eq!(directions_url(None, &config), "https://maps.google.com");
    }

    #[test]
    fn popup_html_escapes_values() {
        let details = PaymentDetails {
            account_name: "<b>A & B</b>".to_string(),
            ..fallback()
        };
        let options = PopupOptions::payment(QR_BOX_TITLE, &details, "https://x/qr.png?a=1&b=2");
        assert!(options.html.contains("&lt;b&gt;A &amp; B&lt;/b&gt;"));
        assert!(options.html.contains("https://x/qr.png?a=1&amp;b=2"));
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["showCloseButton"], true);
        assert_eq!(json["showConfirmButton"], false);
        assert_eq!(json["customClass"]["popup"], "qr-popup");
    }
}
