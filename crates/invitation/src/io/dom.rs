//! Browser page adapter.
//!
//! [`WebDom`] implements the core's adapter traits over the live document.
//! The free helpers below are the small `web_sys` conveniences every other
//! `io` module shares.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, Window};

use crate::dom::{GalleryDom, ImageNode, PhotoTile, TextDom, TileContainer};
use crate::error::{InvitationError, Result};

pub const ALBUM_SELECTOR: &str = ".photo-gallery-wrapper";
pub const SLIDE_SELECTOR: &str = ".image-gallery-slide";
pub const THUMBNAIL_SELECTOR: &str = ".image-gallery-thumbnail";
pub const TILE_SELECTOR: &str = ".photo-bg-wrap";
pub const NODE_ID_SELECTOR: &str = "[data-node-id]";
pub const TEXT_SLOT_SELECTOR: &str = r#"[contenteditable="false"]"#;
pub const LOCKED_CLASS: &str = "component-locked";

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| InvitationError::element_not_found("window"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| InvitationError::element_not_found("document"))
}

/// Human-readable text of a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Map a value thrown by the browser call `what` to an error.
pub fn js_error(what: &'static str) -> impl Fn(JsValue) -> InvitationError {
    move |value| InvitationError::browser_call(what, describe(&value))
}

pub fn node_id_selector(node_id: &str) -> String {
    format!(r#"[data-node-id="{node_id}"]"#)
}

pub fn query(parent: &impl AsRef<web_sys::Node>, selector: &str) -> Option<Element> {
    let node = parent.as_ref();
    if let Some(document) = node.dyn_ref::<Document>() {
        return document.query_selector(selector).ok().flatten();
    }
    node.dyn_ref::<Element>()
        .and_then(|element| element.query_selector(selector).ok().flatten())
}

/// Matches of `selector` below `parent`, in document order.
pub fn query_all(parent: &impl AsRef<web_sys::Node>, selector: &str) -> Vec<Element> {
    let node = parent.as_ref();
    let list = if let Some(document) = node.dyn_ref::<Document>() {
        document.query_selector_all(selector)
    } else if let Some(element) = node.dyn_ref::<Element>() {
        element.query_selector_all(selector)
    } else {
        return Vec::new();
    };
    let Ok(list) = list else {
        log::debug!("Invalid selector: {selector}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        if let Err(error) = element.style().set_property(property, value) {
            log::debug!("Cannot set {property}: {}", describe(&error));
        }
    }
}

pub fn inline_style(element: &Element, property: &str) -> Option<String> {
    let value = element
        .dyn_ref::<HtmlElement>()?
        .style()
        .get_property_value(property)
        .ok()?;
    (!value.is_empty()).then_some(value)
}

/// Swap `remove` for `add` in the element's class list.
pub fn replace_class(element: &Element, remove: &str, add: &str) {
    let classes = element.class_list();
    let _ = classes.remove_1(remove);
    let _ = classes.add_1(add);
}

pub fn toggle_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

/// Attach `handler` for the lifetime of the page.
pub fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_error("addEventListener"))?;
    // Page elements outlive every handler; nothing ever removes them.
    closure.forget();
    Ok(())
}

/// Like [`listen`], registered as a passive listener.
pub fn listen_passive(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<()> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(true);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(js_error("addEventListener"))?;
    closure.forget();
    Ok(())
}

/// The live document seen through the core's adapter traits.
#[derive(Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        Ok(Self {
            document: document()?,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn by_id(&self, id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| InvitationError::element_not_found(format!("#{id}")))
    }

    pub fn require(&self, selector: &str) -> Result<Element> {
        query(&self.document, selector).ok_or_else(|| InvitationError::element_not_found(selector))
    }

    pub fn query(&self, selector: &str) -> Option<Element> {
        query(&self.document, selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        query_all(&self.document, selector)
    }

    fn album(&self) -> Option<Element> {
        self.query(ALBUM_SELECTOR)
    }

    /// `<img>`s below the album matching `selector`, targeting their
    /// closest `container`.
    fn album_images(&self, selector: &str, container: &str) -> Vec<ImageNode<Element>> {
        let Some(album) = self.album() else {
            return Vec::new();
        };
        query_all(&album, selector)
            .into_iter()
            .filter_map(|img| {
                let target = closest(&img, container)?;
                let src = match img.dyn_ref::<HtmlImageElement>() {
                    Some(img) => img.src(),
                    None => img.get_attribute("src")?,
                };
                let alt = img.get_attribute("alt");
                Some(ImageNode { src, alt, target })
            })
            .collect()
    }
}

impl TextDom for WebDom {
    type Node = Element;

    fn text_slot(&self, node_id: &str) -> Result<Element> {
        let selector = node_id_selector(node_id);
        let element = self.require(&selector)?;
        query(&element, TEXT_SLOT_SELECTOR).ok_or_else(|| {
            InvitationError::element_not_found(format!("{selector} {TEXT_SLOT_SELECTOR}"))
        })
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn set_title(&mut self, title: &str) {
        self.document.set_title(title);
    }
}

impl GalleryDom for WebDom {
    type Node = Element;

    fn album_slide_images(&self) -> Vec<ImageNode<Element>> {
        self.album_images(&format!("{SLIDE_SELECTOR} img"), SLIDE_SELECTOR)
    }

    fn album_thumbnail_images(&self) -> Vec<ImageNode<Element>> {
        self.album_images(&format!("{THUMBNAIL_SELECTOR} img"), THUMBNAIL_SELECTOR)
    }

    fn photo_tiles(&self) -> Vec<PhotoTile<Element>> {
        self.query_all(TILE_SELECTOR)
            .into_iter()
            .map(|tile| PhotoTile {
                background_image: inline_style(&tile, "background-image"),
                inside_album: closest(&tile, ALBUM_SELECTOR).is_some(),
                container: closest(&tile, NODE_ID_SELECTOR).map(|node| TileContainer {
                    locked: node.class_list().contains(LOCKED_CLASS),
                    node,
                }),
            })
            .collect()
    }
}
