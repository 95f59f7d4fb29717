//! Browser side of the peripheral widgets.
//!
//! Each `init_*` checks its prerequisites before attaching anything and
//! returns `ElementNotFound` when the page has not rendered them yet, so it
//! can run under an [`InitGate`](crate::core::init::InitGate).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Element, Event, HtmlAudioElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};
use zoon::Task;

use super::dom::{
    ALBUM_SELECTOR, SLIDE_SELECTOR, WebDom, closest, describe, js_error, listen, listen_passive,
    node_id_selector, query, query_all, replace_class, set_style, toggle_class, window,
};
use super::page::SharedData;
use super::popup;
use super::timers::{IntervalHandle, after};
use crate::core::widgets::audio::{AudioCommand, AudioState, PLAYING_CLASS};
use crate::core::widgets::carousel::{Carousel, SLIDE_TRANSITION, SlideClass};
use crate::core::widgets::countdown::{CELL_IDS, Countdown};
use crate::core::widgets::envelope::{Envelope, OPEN_CLASS};
use crate::core::widgets::payment::{
    GIFT_TITLE, PaymentDetails, PopupOptions, QR_BOX_TITLE, directions_url,
};
use crate::core::widgets::reveal::{
    ANIMATION_ATTR, DELAY_ATTR, REVEALED_CLASS, REVEALED_TRANSFORM, RevealAnimation,
    RevealTracker, TRANSITION, VISIBILITY_THRESHOLD, transition_delay,
};
use crate::error::{InvitationError, Result};

pub const AUDIO_ID: &str = "bg-music";
pub const AUDIO_TOGGLE_SELECTOR: &str = ".audio-toggle";
pub const MUSIC_ICON_SELECTOR: &str = ".music-icon";
pub const ENVELOPE_SELECTOR: &str = r#".animated-envelope-component[data-node-id="FlIA12U-JR"]"#;
pub const ENVELOPE_CONTAINER_SELECTOR: &str = ".envelope-container";
pub const QR_BOX_SELECTOR: &str = ".qr-box-component";
pub const DIRECTIONS_BUTTON_ID: &str = "btn-directions";
pub const GIFT_BUTTON_ID: &str = "btn-gift";
/// Venue block that doubles as a directions link.
pub const VENUE_NODE_ID: &str = "MXcj3JAluy";

fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

// --- Countdown ---

pub fn init_countdown(dom: &WebDom, data: &SharedData) -> Result<IntervalHandle> {
    let cells = CELL_IDS
        .iter()
        .map(|id| dom.by_id(id))
        .collect::<Result<Vec<_>>>()?;
    let (target_ms, tick_ms) = {
        let data = data.borrow();
        (data.config.wedding_timestamp_ms()?, data.config.countdown_tick_ms)
    };
    let countdown = Countdown::new(target_ms);
    let render = move || {
        let labels = countdown.tick(now_ms()).labels();
        for (cell, label) in cells.iter().zip(labels.iter()) {
            cell.set_text_content(Some(label.as_str()));
        }
    };
    render();
    IntervalHandle::start(tick_ms, render)
}

// --- Carousel ---

pub fn init_carousel(dom: &WebDom, data: &SharedData) -> Result<IntervalHandle> {
    let album = dom.require(ALBUM_SELECTOR)?;
    let slides = query_all(&album, SLIDE_SELECTOR);
    let carousel = Carousel::new(slides.len())
        .ok_or_else(|| InvitationError::element_not_found(SLIDE_SELECTOR))?;
    let (interval_ms, resume_delay_ms) = {
        let data = data.borrow();
        (data.config.carousel_interval_ms, data.config.carousel_resume_delay_ms)
    };
    let carousel = Rc::new(RefCell::new(carousel));

    listen(&album, "mouseenter", {
        let carousel = Rc::clone(&carousel);
        move |_| carousel.borrow_mut().pointer_entered()
    })?;
    listen(&album, "mouseleave", {
        let carousel = Rc::clone(&carousel);
        move |_| carousel.borrow_mut().pointer_left()
    })?;
    listen_passive(&album, "touchstart", {
        let carousel = Rc::clone(&carousel);
        move |_| carousel.borrow_mut().touch_started()
    })?;
    listen_passive(&album, "touchend", {
        let carousel = Rc::clone(&carousel);
        move |_| {
            let token = carousel.borrow_mut().touch_ended();
            let carousel = Rc::clone(&carousel);
            after(resume_delay_ms, move || {
                carousel.borrow_mut().resume(token);
            });
        }
    })?;

    log::info!("Carousel initialized with {} slides", slides.len());
    IntervalHandle::start(interval_ms, move || {
        let mut carousel = carousel.borrow_mut();
        if carousel.on_timer().is_none() {
            return;
        }
        for (slide, position) in slides.iter().zip(carousel.positions()) {
            for class in SlideClass::ALL {
                toggle_class(slide, class.class_name(), position.class == Some(class));
            }
            set_style(slide, "transform", &position.transform());
            set_style(slide, "transition", SLIDE_TRANSITION);
        }
    })
}

// --- Audio ---

/// The background music element and its shared playback state.
pub struct AudioPlayer {
    media: HtmlAudioElement,
    toggle: Option<Element>,
    state: RefCell<AudioState>,
}

impl AudioPlayer {
    fn apply(self: &Rc<Self>, command: AudioCommand) {
        match command {
            AudioCommand::Play => self.play(),
            AudioCommand::Pause => self.pause(),
            AudioCommand::Nothing => {}
        }
    }

    fn play(self: &Rc<Self>) {
        let failed = |error: &JsValue| InvitationError::media_unavailable(AUDIO_ID, describe(error));
        let promise = match self.media.play() {
            Ok(promise) => promise,
            Err(error) => {
                self.state.borrow_mut().playback_failed(&failed(&error));
                return;
            }
        };
        let player = Rc::clone(self);
        Task::start(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    player.state.borrow_mut().playback_started();
                    player.mark_playing(true);
                }
                Err(error) => player.state.borrow_mut().playback_failed(&failed(&error)),
            }
        });
    }

    fn pause(&self) {
        if let Err(error) = self.media.pause() {
            log::debug!("Music pause error: {}", describe(&error));
        }
        self.state.borrow_mut().paused();
        self.mark_playing(false);
    }

    fn mark_playing(&self, playing: bool) {
        if let Some(toggle) = &self.toggle {
            toggle_class(toggle, PLAYING_CLASS, playing);
        }
    }

    /// Envelope clicks start music that is not already running.
    pub fn on_envelope_click(self: &Rc<Self>) {
        let command = self
            .state
            .borrow_mut()
            .on_envelope_click(self.media.paused());
        self.apply(command);
    }
}

pub fn init_audio(dom: &WebDom, data: &SharedData) -> Result<Rc<AudioPlayer>> {
    let media: HtmlAudioElement = dom
        .by_id(AUDIO_ID)?
        .dyn_into()
        .map_err(|_| InvitationError::element_not_found(format!("#{AUDIO_ID} <audio>")))?;
    media.set_volume(data.borrow().config.audio_volume);
    let toggle = dom.query(AUDIO_TOGGLE_SELECTOR);
    let music_icon = dom.query(MUSIC_ICON_SELECTOR);
    let player = Rc::new(AudioPlayer {
        media,
        toggle: toggle.clone(),
        state: RefCell::new(AudioState::new()),
    });

    listen(dom.document(), "click", {
        let player = Rc::clone(&player);
        move |event: Event| {
            let on_control = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .is_some_and(|target| {
                    closest(&target, AUDIO_TOGGLE_SELECTOR).is_some()
                        || closest(&target, MUSIC_ICON_SELECTOR).is_some()
                });
            let command = player.state.borrow_mut().on_page_click(on_control);
            player.apply(command);
        }
    })?;
    for control in [music_icon, toggle].into_iter().flatten() {
        let player = Rc::clone(&player);
        listen(&control, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            let command = player.state.borrow_mut().on_toggle();
            player.apply(command);
        })?;
    }
    Ok(player)
}

// --- Envelope ---

pub fn init_envelope(dom: &WebDom, on_click: impl Fn() + 'static) -> Result<()> {
    let component = dom.require(ENVELOPE_SELECTOR)?;
    let container = query(&component, ENVELOPE_CONTAINER_SELECTOR)
        .ok_or_else(|| InvitationError::element_not_found(ENVELOPE_CONTAINER_SELECTOR))?;
    set_style(&component, "cursor", "pointer");
    listen(&component, "click", move |event| {
        event.stop_propagation();
        on_click();
        let state = Envelope::from_open_class(container.class_list().contains(OPEN_CLASS)).toggled();
        let (add, remove) = state.classes();
        replace_class(&container, remove, add);
        log::debug!("Envelope {state:?}");
    })
}

// --- Payment popup and toolbar ---

fn show_payment(data: &SharedData, title: &str, gift: bool) {
    let options = {
        let data = data.borrow();
        let details = PaymentDetails::for_variant(data.variant.as_ref(), &data.config);
        let url = if gift {
            details.gift_qr_url(&data.config.qr_service_base)
        } else {
            details.qr_url(&data.config.qr_service_base)
        };
        PopupOptions::payment(title, &details, &url)
    };
    popup::show_or_log(&options);
}

fn open_directions(data: &SharedData) {
    let url = {
        let data = data.borrow();
        directions_url(data.variant.as_ref(), &data.config).to_string()
    };
    let opened = window().and_then(|window| {
        window
            .open_with_url_and_target(&url, "_blank")
            .map_err(js_error("window.open"))
    });
    match opened {
        Ok(_) => log::info!("Opening directions: {url}"),
        Err(error) => log::warn!("{error}"),
    }
}

pub fn init_qr_boxes(dom: &WebDom, data: &SharedData) -> Result<()> {
    let boxes = dom.query_all(QR_BOX_SELECTOR);
    if boxes.is_empty() {
        return Err(InvitationError::element_not_found(QR_BOX_SELECTOR));
    }
    for qr_box in &boxes {
        set_style(qr_box, "cursor", "pointer");
        let data = Rc::clone(data);
        listen(qr_box, "click", move |event| {
            event.stop_propagation();
            show_payment(&data, QR_BOX_TITLE, false);
        })?;
    }
    log::info!("QR popup initialized with {} QR boxes", boxes.len());
    Ok(())
}

pub fn init_toolbar(dom: &WebDom, data: &SharedData) -> Result<()> {
    let directions = dom.by_id(DIRECTIONS_BUTTON_ID)?;
    let gift = dom.by_id(GIFT_BUTTON_ID)?;

    let mut direction_targets = vec![directions];
    if let Some(venue) = dom.query(&node_id_selector(VENUE_NODE_ID)) {
        set_style(&venue, "cursor", "pointer");
        direction_targets.push(venue);
    }
    for target in &direction_targets {
        let data = Rc::clone(data);
        listen(target, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            open_directions(&data);
        })?;
    }

    let data = Rc::clone(data);
    listen(&gift, "click", move |event| {
        event.prevent_default();
        event.stop_propagation();
        show_payment(&data, GIFT_TITLE, true);
    })
}

// --- Scroll reveal ---

pub fn init_reveal(dom: &WebDom) -> Result<()> {
    let window = window()?;
    let supported = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false);
    if !supported {
        return Err(InvitationError::element_not_found("IntersectionObserver"));
    }
    let selector = format!("[{ANIMATION_ATTR}]");
    let elements = dom.query_all(&selector);
    if elements.is_empty() {
        return Err(InvitationError::element_not_found(selector));
    }

    for element in &elements {
        let animation = RevealAnimation::from_attr(
            element.get_attribute(ANIMATION_ATTR).as_deref().unwrap_or_default(),
        );
        let delay = transition_delay(element.get_attribute(DELAY_ATTR).as_deref());
        set_style(element, "transition", TRANSITION);
        set_style(element, "transition-delay", &delay);
        set_style(element, "opacity", "0");
        set_style(element, "transform", animation.hidden_transform());
    }

    let mut tracker = RevealTracker::new();
    let observed = elements.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                let Some(position) = observed.iter().position(|element| *element == target) else {
                    continue;
                };
                if tracker.reveal(position) {
                    set_style(&target, "opacity", "1");
                    set_style(&target, "transform", REVEALED_TRANSFORM);
                    toggle_class(&target, REVEALED_CLASS, true);
                    log::debug!(
                        "Revealed {}",
                        target.get_attribute("data-node-id").unwrap_or_default()
                    );
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
    options.set_root_margin("0px");
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(js_error("IntersectionObserver"))?;
    for element in &elements {
        observer.observe(element);
    }
    // The observer calls back for the rest of the page's life.
    callback.forget();
    log::info!("Scroll reveal initialized for {} elements", elements.len());
    Ok(())
}
