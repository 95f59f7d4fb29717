//! Gallery indexing.
//!
//! Builds ONE ordered image list out of two independently rendered regions
//! (album slides, then standalone photo tiles) and binds every clickable
//! element to its position in that list.
//!
//! # Invariants
//!
//! - Only images under the approved host prefix enter the list.
//! - Order is album pass first, then tile pass, each in DOM order.
//! - Every binding points into `0..images.len()` and every position has at
//!   least one binding. Tiles that cannot be clicked (no container, or a
//!   locked container) are left out of the list as well, so navigating the
//!   viewer never lands on an image the page does not offer.
//! - Building is a pure function of the page state: running it twice on the
//!   same page yields the same list and bindings.

use super::init::InitGate;
use crate::config::InvitationConfig;
use crate::dom::GalleryDom;
use crate::error::{InvitationError, Result};

/// Id of the off-screen link container the viewer library reads.
pub const LINK_CONTAINER_ID: &str = "photoswipe-gallery";

const DEFAULT_ALT: &str = "Photo";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryImage {
    /// Canonicalized to request the best-quality transcoding.
    pub source_url: String,
    /// Provisional until the viewer decodes the real image.
    pub width: u32,
    pub height: u32,
    pub alt_text: String,
    pub origin: ImageOrigin,
}

/// Which element produced an image: its position within its scan pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOrigin {
    AlbumSlide(usize),
    PhotoTile(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    AlbumSlide,
    AlbumThumbnail,
    PhotoTile,
}

/// A clickable element and the list position it opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexBinding<N> {
    pub target: N,
    pub index: usize,
    pub kind: BindingKind,
}

/// One `<a>` of the off-screen link container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkEntry {
    pub href: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gallery<N> {
    images: Vec<GalleryImage>,
    bindings: Vec<IndexBinding<N>>,
}

impl<N> Gallery<N> {
    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn bindings(&self) -> &[IndexBinding<N>] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Off-screen link container contents, 1:1 with the image list.
    pub fn link_entries(&self) -> Vec<LinkEntry> {
        self.images
            .iter()
            .map(|image| LinkEntry {
                href: image.source_url.clone(),
                width: image.width,
                height: image.height,
                alt: image.alt_text.clone(),
            })
            .collect()
    }

    /// Hand the image list to the viewer, keeping the bindings.
    pub fn into_parts(self) -> (Vec<GalleryImage>, Vec<IndexBinding<N>>) {
        (self.images, self.bindings)
    }
}

/// Eligibility and canonicalization rules.
#[derive(Clone, Debug)]
pub struct ImagePolicy {
    pub host_prefix: String,
    pub quality_transform: String,
    pub placeholder_width: u32,
    pub placeholder_height: u32,
}

impl ImagePolicy {
    pub fn from_config(config: &InvitationConfig) -> Self {
        Self {
            host_prefix: config.approved_host_prefix.clone(),
            quality_transform: config.quality_transform.clone(),
            placeholder_width: config.placeholder_width,
            placeholder_height: config.placeholder_height,
        }
    }

    pub fn is_eligible(&self, url: &str) -> bool {
        !self.host_prefix.is_empty() && url.starts_with(&self.host_prefix)
    }

    /// Ask the media host for its best-quality transcoding.
    ///
    /// Inserts the transform right after the first `/upload/` segment;
    /// URLs without one, or already carrying the transform, pass through.
    pub fn canonical_url(&self, url: &str) -> String {
        let marker = "/upload/";
        let Some(at) = url.find(marker) else {
            return url.to_string();
        };
        let (head, tail) = url.split_at(at + marker.len());
        if tail.starts_with(&format!("{}/", self.quality_transform)) {
            return url.to_string();
        }
        format!("{head}{}/{tail}", self.quality_transform)
    }

    fn image(&self, url: &str, alt: Option<&str>, origin: ImageOrigin) -> GalleryImage {
        GalleryImage {
            source_url: self.canonical_url(url),
            width: self.placeholder_width,
            height: self.placeholder_height,
            alt_text: alt
                .filter(|alt| !alt.is_empty())
                .unwrap_or(DEFAULT_ALT)
                .to_string(),
            origin,
        }
    }
}

/// URL inside an inline CSS `url(...)` value, double quotes stripped.
///
/// Only the `url("...")` / `url(...)` serialization browsers produce for
/// inline styles is understood; `none`, gradients and anything else yield
/// `None`.
pub fn css_background_url(value: &str) -> Option<String> {
    let inner = value.trim().strip_prefix("url(")?.strip_suffix(')')?;
    let url = inner.replace('"', "");
    (!url.is_empty()).then_some(url)
}

/// Scan the page and build the ordered image list with its bindings.
pub fn build_gallery<D: GalleryDom>(dom: &D, policy: &ImagePolicy) -> Gallery<D::Node> {
    let mut images = Vec::new();
    let mut bindings = Vec::new();

    // Album pass: slides in DOM order
    let slides = dom.album_slide_images();
    log::debug!("Found album images: {}", slides.len());
    for (position, slide) in slides.into_iter().enumerate() {
        if !policy.is_eligible(&slide.src) {
            continue;
        }
        bindings.push(IndexBinding {
            target: slide.target,
            index: images.len(),
            kind: BindingKind::AlbumSlide,
        });
        images.push(policy.image(
            &slide.src,
            slide.alt.as_deref(),
            ImageOrigin::AlbumSlide(position),
        ));
    }
    let album_count = images.len();

    // Thumbnails mirror the slides: the n-th eligible thumbnail opens the
    // n-th eligible slide.
    let eligible_thumbnails = dom
        .album_thumbnail_images()
        .into_iter()
        .filter(|thumbnail| policy.is_eligible(&thumbnail.src));
    for (index, thumbnail) in eligible_thumbnails.enumerate() {
        if index >= album_count {
            log::debug!("Thumbnail {index} has no matching slide; not clickable");
            continue;
        }
        bindings.push(IndexBinding {
            target: thumbnail.target,
            index,
            kind: BindingKind::AlbumThumbnail,
        });
    }

    // Tile pass, continuing the index where the album left off
    let tiles = dom.photo_tiles();
    log::debug!("Found photo components: {}", tiles.len());
    for (position, tile) in tiles.into_iter().enumerate() {
        if tile.inside_album {
            continue;
        }
        let Some(url) = tile
            .background_image
            .as_deref()
            .and_then(css_background_url)
        else {
            continue;
        };
        if !policy.is_eligible(&url) {
            continue;
        }
        let Some(container) = tile.container.filter(|container| !container.locked) else {
            log::debug!("Photo tile {position} is not clickable; left out of the gallery");
            continue;
        };
        bindings.push(IndexBinding {
            target: container.node,
            index: images.len(),
            kind: BindingKind::PhotoTile,
        });
        images.push(policy.image(&url, None, ImageOrigin::PhotoTile(position)));
    }

    log::info!("Total gallery images: {}", images.len());
    Gallery { images, bindings }
}

/// Outcome of one indexing attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryOutcome {
    Built { images: usize, bindings: usize },
    AlreadyBuilt,
    /// No eligible image yet; a later attempt may still succeed.
    NothingToShow,
    /// Images were found but the viewer could not take them; a later
    /// attempt indexes the page again.
    NotAttached(InvitationError),
}

/// At-most-once gallery construction per page session.
///
/// Attempts before eligible content has rendered, or before the viewer can
/// take the gallery, leave no trace; the first attempt that finds images and
/// hands them over wins and later attempts are no-ops.
pub struct GalleryIndexer<N> {
    policy: ImagePolicy,
    gate: InitGate,
    gallery: Option<Gallery<N>>,
}

impl<N: Clone> GalleryIndexer<N> {
    pub fn new(policy: ImagePolicy) -> Self {
        Self {
            policy,
            gate: InitGate::new("gallery"),
            gallery: None,
        }
    }

    pub fn gallery(&self) -> Option<&Gallery<N>> {
        self.gallery.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.gate.is_done()
    }

    /// Index the page and keep the gallery.
    pub fn ensure_built<D: GalleryDom<Node = N>>(&mut self, dom: &D) -> GalleryOutcome {
        let mut built = None;
        let outcome = self.ensure_attached(dom, |gallery| {
            built = Some(gallery);
            Ok(())
        });
        if built.is_some() {
            self.gallery = built;
        }
        outcome
    }

    /// Index the page and hand the gallery to `attach`.
    ///
    /// The indexer only counts as built once `attach` succeeds.
    pub fn ensure_attached<D: GalleryDom<Node = N>>(
        &mut self,
        dom: &D,
        attach: impl FnOnce(Gallery<N>) -> Result<()>,
    ) -> GalleryOutcome {
        if self.gate.is_done() {
            return GalleryOutcome::AlreadyBuilt;
        }
        let gallery = build_gallery(dom, &self.policy);
        if gallery.is_empty() {
            log::warn!("No images found for the photo gallery");
            return GalleryOutcome::NothingToShow;
        }
        let outcome = GalleryOutcome::Built {
            images: gallery.len(),
            bindings: gallery.bindings().len(),
        };
        if let Err(error) = attach(gallery) {
            log::warn!("Photo viewer unavailable: {error}");
            return GalleryOutcome::NotAttached(error);
        }
        self.gate.mark_done();
        outcome
    }
}
