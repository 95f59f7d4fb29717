//! Page bootstrap and component state.
//!
//! [`start`] builds one [`Page`] and hands `Rc` clones of it to every event
//! handler. Each lifecycle signal (content parsed, fully loaded, data
//! settled) triggers one initialization pass immediately and another after
//! the configured settle delay; the gates inside `Page` make every component
//! initialize at most once no matter how many passes run.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Element;
use zoon::Task;

use super::console;
use super::dom::{WebDom, listen, window};
use super::fetch::fetch_document;
use super::lightbox::{self, AttachedGallery};
use super::timers::{IntervalHandle, after};
use super::widgets::{self, AudioPlayer};
use crate::config::{self, ConfigSource, InvitationConfig};
use crate::core::binding;
use crate::core::data::{SelectedVariant, selector_from_query};
use crate::core::gallery::{GalleryIndexer, GalleryOutcome, ImagePolicy};
use crate::core::init::{DataSettle, DataWait, InitGate, Lifecycle};
use crate::core::viewer::ViewerOptions;
use crate::error::Result;

/// What the data document decided. Read by click handlers at click time.
#[derive(Debug, Default)]
pub struct PageData {
    pub config: InvitationConfig,
    pub variant: Option<SelectedVariant>,
    pub wait: DataWait,
}

pub type SharedData = Rc<RefCell<PageData>>;

struct Gates {
    countdown: InitGate,
    carousel: InitGate,
    audio: InitGate,
    envelope: InitGate,
    qr_boxes: InitGate,
    toolbar: InitGate,
    reveal: InitGate,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            countdown: InitGate::new("countdown"),
            carousel: InitGate::new("carousel"),
            audio: InitGate::new("music"),
            envelope: InitGate::new("envelope"),
            qr_boxes: InitGate::new("QR popup"),
            toolbar: InitGate::new("toolbar"),
            reveal: InitGate::new("scroll reveal"),
        }
    }
}

pub struct Page {
    dom: WebDom,
    data: SharedData,
    indexer: RefCell<Option<GalleryIndexer<Element>>>,
    gallery: RefCell<Option<AttachedGallery>>,
    audio: RefCell<Option<Rc<AudioPlayer>>>,
    intervals: RefCell<Vec<IntervalHandle>>,
    gates: RefCell<Gates>,
}

impl Page {
    fn new() -> Result<Self> {
        Ok(Self {
            dom: WebDom::new()?,
            data: SharedData::default(),
            indexer: RefCell::new(None),
            gallery: RefCell::new(None),
            audio: RefCell::new(None),
            intervals: RefCell::new(Vec::new()),
            gates: RefCell::new(Gates::default()),
        })
    }

    /// Fetch the data document, bind the selected side and settle.
    fn load_data(self: &Rc<Self>, search: String) {
        let page = Rc::clone(self);
        Task::start(async move {
            let data_url = page.data.borrow().config.data_url.clone();
            let settle = match fetch_document(&data_url).await {
                Ok(document) => {
                    let loaded = config::load_from_document(&document.as_value());
                    if loaded.source == ConfigSource::DataDocument {
                        log::info!("Using settings from the data document");
                    }
                    let requested = selector_from_query(&search, &loaded.config.selector_key);
                    let variant = document.resolve(requested.as_deref(), &loaded.config.fallback_side);
                    let mut data = page.data.borrow_mut();
                    data.config = loaded.config;
                    match variant {
                        Ok(variant) => data.variant = Some(variant),
                        Err(error) => log::warn!("{error}"),
                    }
                    DataSettle::Fetched
                }
                Err(error) => {
                    log::warn!("{error}");
                    DataSettle::FetchFailed
                }
            };
            page.bind_fields();
            page.settle(settle);
        });
    }

    /// Give up on the data document after `data_wait_ms`.
    fn wait_for_data(self: &Rc<Self>) {
        let wait_ms = self.data.borrow().config.data_wait_ms;
        let page = Rc::clone(self);
        after(wait_ms, move || {
            if !page.data.borrow().wait.is_settled() {
                log::warn!("Wedding data still loading after {wait_ms} ms; starting with default settings");
            }
            page.settle(DataSettle::TimedOut);
        });
    }

    fn settle(self: &Rc<Self>, how: DataSettle) {
        let first = self.data.borrow_mut().wait.settle(how);
        if first {
            self.on_lifecycle(Lifecycle::DataSettled);
        }
    }

    fn bind_fields(&self) {
        let data = self.data.borrow();
        let mut dom = self.dom.clone();
        binding::apply_selected(&mut dom, data.variant.as_ref(), &data.config);
    }

    fn on_lifecycle(self: &Rc<Self>, signal: Lifecycle) {
        log::debug!("Lifecycle: {signal:?}");
        self.initialize();
        let delay_ms = self.data.borrow().config.settle_delay_ms;
        let page = Rc::clone(self);
        after(delay_ms, move || page.initialize());
    }

    /// One initialization pass over every component not yet initialized.
    fn initialize(self: &Rc<Self>) {
        if !self.data.borrow().wait.is_settled() {
            log::debug!("Wedding data not settled yet; deferring initialization");
            return;
        }
        self.init_gallery();

        let mut gates = self.gates.borrow_mut();
        let dom = &self.dom;
        let data = &self.data;
        gates.audio.attempt(|| {
            let player = widgets::init_audio(dom, data)?;
            *self.audio.borrow_mut() = Some(player);
            Ok(())
        });
        gates.envelope.attempt(|| {
            let page = Rc::clone(self);
            widgets::init_envelope(dom, move || {
                if let Some(player) = page.audio.borrow().as_ref() {
                    player.on_envelope_click();
                }
            })
        });
        gates.countdown.attempt(|| {
            let interval = widgets::init_countdown(dom, data)?;
            self.intervals.borrow_mut().push(interval);
            Ok(())
        });
        gates.carousel.attempt(|| {
            let interval = widgets::init_carousel(dom, data)?;
            self.intervals.borrow_mut().push(interval);
            Ok(())
        });
        gates.qr_boxes.attempt(|| widgets::init_qr_boxes(dom, data));
        gates.toolbar.attempt(|| widgets::init_toolbar(dom, data));
        gates.reveal.attempt(|| widgets::init_reveal(dom));
    }

    fn init_gallery(&self) {
        let mut indexer = self.indexer.borrow_mut();
        let indexer = indexer.get_or_insert_with(|| {
            GalleryIndexer::new(ImagePolicy::from_config(&self.data.borrow().config))
        });
        let outcome = indexer.ensure_attached(&self.dom, |gallery| {
            let attached = lightbox::attach(self.dom.document(), gallery, ViewerOptions::default())?;
            *self.gallery.borrow_mut() = Some(attached);
            Ok(())
        });
        if let GalleryOutcome::Built { images, bindings } = outcome {
            log::debug!("Gallery indexed: {images} images, {bindings} click targets");
        }
    }
}

/// Entry point: install logging, load data and hook the page lifecycle.
pub fn start() {
    let search = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default();
    console::init(&search);

    let page = match Page::new() {
        Ok(page) => Rc::new(page),
        Err(error) => {
            log::error!("Invitation page cannot start: {error}");
            return;
        }
    };
    page.load_data(search);
    page.wait_for_data();
    if let Err(error) = watch_lifecycle(&page) {
        log::warn!("{error}");
    }
}

/// Fire the lifecycle signals, including those that passed before start.
fn watch_lifecycle(page: &Rc<Page>) -> Result<()> {
    let ready_state = page.dom.document().ready_state();
    log::debug!("Document ready state: {ready_state}");
    match ready_state.as_str() {
        "complete" => {
            page.on_lifecycle(Lifecycle::ContentParsed);
            page.on_lifecycle(Lifecycle::FullyLoaded);
            return Ok(());
        }
        "interactive" => page.on_lifecycle(Lifecycle::ContentParsed),
        _ => {
            let document = page.dom.document().clone();
            let page = Rc::clone(page);
            listen(&document, "DOMContentLoaded", move |_| {
                page.on_lifecycle(Lifecycle::ContentParsed)
            })?;
        }
    }
    let page = Rc::clone(page);
    listen(&window()?, "load", move |_| page.on_lifecycle(Lifecycle::FullyLoaded))
}
