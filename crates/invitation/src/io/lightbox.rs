//! PhotoSwipe bindings and the gallery click wiring.
//!
//! The host page loads PhotoSwipe as globals (`window.PhotoSwipeLightbox`,
//! `window.PhotoSwipe`). The lightbox resolves slides from the off-screen
//! link container; this module mounts that container, hooks the
//! lightbox's `itemData` and `destroy` events into [`ViewerController`] and
//! routes clicks on bound elements through [`open_in`].

use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlImageElement};
use zoon::Task;

use super::dom::{describe, js_error, listen, set_style, window};
use crate::core::gallery::{Gallery, LINK_CONTAINER_ID, LinkEntry};
use crate::core::viewer::{
    Lightbox, MetadataOutcome, OpenOutcome, ViewerController, ViewerOptions, open_in,
};
use crate::error::{InvitationError, Result};

#[wasm_bindgen]
extern "C" {
    type PhotoSwipeLightbox;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> std::result::Result<PhotoSwipeLightbox, JsValue>;

    #[wasm_bindgen(method)]
    fn init(this: &PhotoSwipeLightbox);

    #[wasm_bindgen(method, catch, js_name = loadAndOpen)]
    fn load_and_open(this: &PhotoSwipeLightbox, index: u32) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &PhotoSwipeLightbox, name: &str, callback: &js_sys::Function);
}

pub struct WebLightbox {
    inner: PhotoSwipeLightbox,
    // Kept alive for as long as the lightbox can fire them.
    handlers: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl WebLightbox {
    fn new(options: &ViewerOptions) -> Result<Self> {
        let window = window()?;
        let lightbox_class = js_sys::Reflect::get(&window, &JsValue::from_str("PhotoSwipeLightbox"))
            .map_err(js_error("window.PhotoSwipeLightbox"))?;
        if lightbox_class.is_undefined() {
            return Err(InvitationError::element_not_found("window.PhotoSwipeLightbox"));
        }
        let module = js_sys::Reflect::get(&window, &JsValue::from_str("PhotoSwipe"))
            .map_err(js_error("window.PhotoSwipe"))?;
        if module.is_undefined() {
            return Err(InvitationError::element_not_found("window.PhotoSwipe"));
        }
        let options = serde_wasm_bindgen::to_value(options)
            .map_err(|error| InvitationError::Decode(error.to_string()))?;
        js_sys::Reflect::set(&options, &JsValue::from_str("pswpModule"), &module)
            .map_err(js_error("pswpModule"))?;
        let inner = PhotoSwipeLightbox::new(&options).map_err(js_error("new PhotoSwipeLightbox"))?;
        Ok(Self {
            inner,
            handlers: Vec::new(),
        })
    }

    fn on(&mut self, name: &str, handler: impl FnMut(JsValue) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(JsValue)>);
        self.inner.on(name, closure.as_ref().unchecked_ref());
        self.handlers.push(closure);
    }
}

impl Lightbox for WebLightbox {
    fn load_and_open(&self, index: usize) -> Result<()> {
        let slide = u32::try_from(index).map_err(|_| {
            InvitationError::browser_call(
                "PhotoSwipeLightbox.loadAndOpen",
                format!("slide {index} out of range"),
            )
        })?;
        let opened = self
            .inner
            .load_and_open(slide)
            .map_err(js_error("PhotoSwipeLightbox.loadAndOpen"))?;
        // `false` while a previous overlay is still fading out.
        if opened.as_bool() == Some(false) {
            return Err(InvitationError::browser_call(
                "PhotoSwipeLightbox.loadAndOpen",
                "previous overlay still open",
            ));
        }
        Ok(())
    }
}

/// A gallery attached to the page. Owns the lightbox and the viewer state.
pub struct AttachedGallery {
    _viewer: Rc<RefCell<ViewerController>>,
    _lightbox: Rc<WebLightbox>,
}

/// Create the lightbox, mount the link container and bind clicks.
///
/// The lightbox comes first: when the library globals are missing nothing is
/// mounted and the gallery can be indexed again on a later pass.
pub fn attach(
    document: &Document,
    gallery: Gallery<Element>,
    options: ViewerOptions,
) -> Result<AttachedGallery> {
    let mut lightbox = WebLightbox::new(&options)?;
    mount_link_container(document, &gallery.link_entries())?;
    let (images, bindings) = gallery.into_parts();
    let viewer = Rc::new(RefCell::new(ViewerController::new(images, options)));

    lightbox.on("itemData", {
        let viewer = Rc::clone(&viewer);
        move |event| correct_dimensions(&viewer, event)
    });
    // `close` fires when the fade-out starts; the overlay is gone on `destroy`.
    lightbox.on("destroy", {
        let viewer = Rc::clone(&viewer);
        move |_| {
            viewer.borrow_mut().close();
        }
    });
    lightbox.inner.init();
    let lightbox = Rc::new(lightbox);

    for binding in bindings {
        set_style(&binding.target, "cursor", "pointer");
        let viewer = Rc::clone(&viewer);
        let lightbox = Rc::clone(&lightbox);
        let index = binding.index;
        listen(&binding.target, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            if let OpenOutcome::Failed(error) = open_in(&viewer, &*lightbox, index) {
                log::warn!("{error}");
            }
        })?;
    }
    log::info!("PhotoSwipe initialized with {} images", viewer.borrow().images().len());

    Ok(AttachedGallery {
        _viewer: viewer,
        _lightbox: lightbox,
    })
}

/// Replace any previous link container with one mirroring `entries`.
fn mount_link_container(document: &Document, entries: &[LinkEntry]) -> Result<()> {
    if let Some(previous) = document.get_element_by_id(LINK_CONTAINER_ID) {
        previous.remove();
    }
    let create = |tag: &str| {
        document
            .create_element(tag)
            .map_err(js_error("createElement"))
    };
    let container = create("div")?;
    container.set_id(LINK_CONTAINER_ID);
    set_style(&container, "display", "none");
    for entry in entries {
        let link = create("a")?;
        let image = create("img")?;
        let attributes = [
            ("href", entry.href.clone()),
            ("data-pswp-width", entry.width.to_string()),
            ("data-pswp-height", entry.height.to_string()),
            ("target", "_blank".to_string()),
        ];
        for (name, value) in &attributes {
            link.set_attribute(name, value).map_err(js_error("setAttribute"))?;
        }
        image.set_attribute("src", &entry.href).map_err(js_error("setAttribute"))?;
        image.set_attribute("alt", &entry.alt).map_err(js_error("setAttribute"))?;
        link.append_child(&image).map_err(js_error("appendChild"))?;
        container.append_child(&link).map_err(js_error("appendChild"))?;
    }
    document
        .body()
        .ok_or_else(|| InvitationError::element_not_found("body"))?
        .append_child(&container)
        .map_err(js_error("appendChild"))?;
    Ok(())
}

/// `itemData` handler: decode the real image and patch the slide's size.
fn correct_dimensions(viewer: &Rc<RefCell<ViewerController>>, event: JsValue) {
    let Some(index) = js_sys::Reflect::get(&event, &JsValue::from_str("index"))
        .ok()
        .and_then(|index| index.as_f64())
    else {
        return;
    };
    let Ok(item_data) = js_sys::Reflect::get(&event, &JsValue::from_str("itemData")) else {
        return;
    };
    let Some(request) = viewer.borrow().request_metadata(index as usize) else {
        return;
    };
    let viewer = Rc::clone(viewer);
    Task::start(async move {
        let decoded = decode_size(&request.source_url).await;
        let outcome = viewer.borrow_mut().on_image_metadata(&request, decoded);
        if let MetadataOutcome::Applied { width, height } = outcome {
            let _ = js_sys::Reflect::set(&item_data, &JsValue::from_str("width"), &width.into());
            let _ = js_sys::Reflect::set(&item_data, &JsValue::from_str("height"), &height.into());
            log::debug!("Image {} is {width}x{height}", request.index);
        }
    });
}

/// Natural size of the image at `url`, once the browser decoded it.
async fn decode_size(url: &str) -> Result<(u32, u32)> {
    let unavailable = |reason: String| InvitationError::media_unavailable(url, reason);
    let image = HtmlImageElement::new().map_err(|error| unavailable(describe(&error)))?;

    let (sender, receiver) = oneshot::channel::<bool>();
    let sender = Rc::new(RefCell::new(Some(sender)));
    let settle = |loaded: bool| {
        let sender = Rc::clone(&sender);
        Closure::wrap(Box::new(move || {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(loaded);
            }
        }) as Box<dyn FnMut()>)
    };
    let on_load = settle(true);
    let on_error = settle(false);
    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_src(url);

    let loaded = receiver.await.unwrap_or(false);
    image.set_onload(None);
    image.set_onerror(None);
    if loaded {
        Ok((image.natural_width(), image.natural_height()))
    } else {
        Err(unavailable("failed to load".to_string()))
    }
}
