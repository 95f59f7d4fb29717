//! Browser smoke tests. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use invitation::core::gallery::build_gallery;
use invitation::core::gallery::ImagePolicy;
use invitation::dom::TextDom;
use invitation::io::dom::{WebDom, js_error};
use invitation::{InvitationConfig, InvitationError};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(html: &str) -> WebDom {
    let dom = WebDom::new().unwrap();
    let body = dom.document().body().unwrap();
    body.set_inner_html(html);
    dom
}

#[wasm_bindgen_test]
fn text_slot_is_the_non_editable_child() {
    let mut dom = mount(
        r#"<div data-node-id="venue_dia_chi"><p contenteditable="false">...</p></div>"#,
    );
    let slot = dom.text_slot("venue_dia_chi").unwrap();
    dom.set_text(&slot, "12 Lê Lợi");
    assert_eq!(slot.text_content().as_deref(), Some("12 Lê Lợi"));
}

#[wasm_bindgen_test]
fn live_page_skips_foreign_and_locked_tiles() {
    let dom = mount(
        r#"
        <div class="photo-gallery-wrapper">
          <div class="image-gallery-slide"><img src="https://res.cloudinary.com/d/image/upload/v1/a.jpg" alt="A"></div>
        </div>
        <div data-node-id="t1"><div class="photo-bg-wrap" style="background-image: url('https://res.cloudinary.com/d/image/upload/v1/b.jpg')"></div></div>
        <div data-node-id="t2" class="component-locked"><div class="photo-bg-wrap" style="background-image: url('https://res.cloudinary.com/d/image/upload/v1/c.jpg')"></div></div>
        <div data-node-id="t3"><div class="photo-bg-wrap" style="background-image: url('https://example.com/d.jpg')"></div></div>
        "#,
    );
    let gallery = build_gallery(&dom, &ImagePolicy::from_config(&InvitationConfig::default()));
    assert_eq!(gallery.len(), 2);
    assert_eq!(gallery.bindings().len(), 2);
}

#[wasm_bindgen_test]
fn thrown_values_are_reported_as_failed_calls() {
    let error = js_error("Swal.fire")(wasm_bindgen::JsValue::from_str("Swal is not defined"));
    assert_eq!(
        error,
        InvitationError::BrowserCall {
            call: "Swal.fire".to_string(),
            reason: "Swal is not defined".to_string(),
        }
    );
}
