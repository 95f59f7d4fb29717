//! Overlay viewer state.
//!
//! The overlay itself belongs to the viewer library (PhotoSwipe); this module
//! owns what the page must get right around it: one overlay at a time, the
//! library's fixed configuration, and asynchronous dimension correction that
//! is discarded once the overlay it was started for has closed.

use std::cell::RefCell;

use serde::Serialize;

use super::gallery::{GalleryImage, LINK_CONTAINER_ID};
use crate::error::{InvitationError, Result};

/// Fixed viewer library configuration. Serialized as the options object
/// handed to the library, so field names follow its camelCase API.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerOptions {
    /// Selector of the off-screen link container.
    pub gallery: String,
    pub children: String,
    pub show_hide_animation_type: String,
    pub bg_opacity: f64,
    pub spacing: f64,
    pub allow_pan_to_next: bool,
    pub zoom: bool,
    pub close: bool,
    pub counter: bool,
    pub arrow_keys: bool,
    pub pinch_to_close: bool,
    pub click_to_close_non_zoomable: bool,
    pub image_click_action: String,
    pub tap_action: String,
    pub max_zoom_level: f64,
    /// Slides preloaded before and after the current one.
    pub preload: [u32; 2],
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            gallery: format!("#{LINK_CONTAINER_ID}"),
            children: "a".to_string(),
            show_hide_animation_type: "fade".to_string(),
            bg_opacity: 0.95,
            spacing: 0.1,
            allow_pan_to_next: true,
            zoom: true,
            close: true,
            counter: true,
            arrow_keys: true,
            pinch_to_close: true,
            click_to_close_non_zoomable: false,
            image_click_action: "zoom".to_string(),
            tap_action: "toggle-controls".to_string(),
            max_zoom_level: 4.0,
            preload: [1, 2],
        }
    }
}

/// The viewer library, seen from the page.
pub trait Lightbox {
    fn load_and_open(&self, index: usize) -> Result<()>;
}

/// Identifies one open overlay; a new one is issued per successful open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(u64);

#[derive(Clone, Copy, Debug)]
struct Session {
    id: SessionId,
    index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The caller should now ask the library to open `index`.
    Opened { index: usize, session: SessionId },
    /// An overlay is already showing; duplicate click handlers land here.
    AlreadyOpen { index: usize },
    OutOfRange { index: usize, len: usize },
    Failed(InvitationError),
}

/// A pending dimension lookup for one image of one overlay session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataRequest {
    pub session: SessionId,
    pub index: usize,
    pub source_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetadataOutcome {
    Applied { width: u32, height: u32 },
    /// Decode failed or reported no size; placeholder dimensions stay.
    KeptPlaceholder,
    /// The overlay closed or the image changed before decode finished.
    Discarded,
}

pub struct ViewerController {
    options: ViewerOptions,
    images: Vec<GalleryImage>,
    session: Option<Session>,
    sessions_started: u64,
}

impl ViewerController {
    pub fn new(images: Vec<GalleryImage>, options: ViewerOptions) -> Self {
        Self {
            options,
            images,
            session: None,
            sessions_started: 0,
        }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Option<&GalleryImage> {
        self.images.get(index)
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Claim the overlay for `index`.
    ///
    /// Does not call the library, so the caller can release any borrow of
    /// the controller first: the library reports item events synchronously
    /// while opening.
    pub fn open_at(&mut self, index: usize) -> OpenOutcome {
        if let Some(session) = self.session {
            log::debug!("Viewer already open at {}; ignoring open at {index}", session.index);
            return OpenOutcome::AlreadyOpen {
                index: session.index,
            };
        }
        if index >= self.images.len() {
            log::warn!("Viewer index {index} out of range (len {})", self.images.len());
            return OpenOutcome::OutOfRange {
                index,
                len: self.images.len(),
            };
        }
        self.sessions_started += 1;
        let id = SessionId(self.sessions_started);
        self.session = Some(Session { id, index });
        log::info!("Opening image at index: {index}");
        OpenOutcome::Opened { index, session: id }
    }

    /// The overlay closed. Pending metadata lookups become stale.
    pub fn close(&mut self) -> bool {
        let was_open = self.session.take().is_some();
        if was_open {
            log::debug!("Viewer closed");
        }
        was_open
    }

    /// Start a dimension lookup for `index` of the open overlay.
    pub fn request_metadata(&self, index: usize) -> Option<MetadataRequest> {
        let session = self.session?;
        let image = self.images.get(index)?;
        Some(MetadataRequest {
            session: session.id,
            index,
            source_url: image.source_url.clone(),
        })
    }

    /// Apply the decoded size of an image, unless the request went stale.
    pub fn on_image_metadata(
        &mut self,
        request: &MetadataRequest,
        decoded: Result<(u32, u32)>,
    ) -> MetadataOutcome {
        let current = self.session.map(|session| session.id);
        if current != Some(request.session) {
            log::debug!("Discarding size of image {}: viewer closed", request.index);
            return MetadataOutcome::Discarded;
        }
        let Some(image) = self
            .images
            .get_mut(request.index)
            .filter(|image| image.source_url == request.source_url)
        else {
            log::debug!("Discarding size of image {}: no longer listed", request.index);
            return MetadataOutcome::Discarded;
        };
        match decoded {
            Ok((width, height)) if width > 0 && height > 0 => {
                image.width = width;
                image.height = height;
                MetadataOutcome::Applied { width, height }
            }
            Ok(_) => MetadataOutcome::KeptPlaceholder,
            Err(error) => {
                log::warn!("{error}");
                MetadataOutcome::KeptPlaceholder
            }
        }
    }
}

/// Open `index` through `lightbox`, holding no borrow while the library runs.
pub fn open_in(
    viewer: &RefCell<ViewerController>,
    lightbox: &dyn Lightbox,
    index: usize,
) -> OpenOutcome {
    let outcome = viewer.borrow_mut().open_at(index);
    let OpenOutcome::Opened { .. } = outcome else {
        return outcome;
    };
    match lightbox.load_and_open(index) {
        Ok(()) => outcome,
        Err(error) => {
            log::warn!("Viewer failed to open image {index}: {error}");
            viewer.borrow_mut().close();
            OpenOutcome::Failed(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gallery::ImageOrigin;
    use std::cell::Cell;

    fn image(name: &str) -> GalleryImage {
        GalleryImage {
            source_url: format!("https://res.cloudinary.com/demo/image/upload/{name}"),
            width: 4000,
            height: 3000,
            alt_text: "Photo".to_string(),
            origin: ImageOrigin::AlbumSlide(0),
        }
    }

    fn viewer(count: usize) -> ViewerController {
        let images = (0..count).map(|i| image(&format!("{i}.jpg"))).collect();
        ViewerController::new(images, ViewerOptions::default())
    }

    #[derive(Default)]
    struct CountingLightbox {
        opens: Cell<usize>,
        fail: bool,
        /// Opens refused before the library accepts again.
        refusals: Cell<usize>,
    }

    impl Lightbox for CountingLightbox {
        fn load_and_open(&self, _index: usize) -> Result<()> {
            if self.fail {
                return Err(InvitationError::element_not_found("PhotoSwipeLightbox"));
            }
            if self.refusals.get() > 0 {
                self.refusals.set(self.refusals.get() - 1);
                return Err(InvitationError::browser_call(
                    "PhotoSwipeLightbox.loadAndOpen",
                    "previous overlay still open",
                ));
            }
            self.opens.set(self.opens.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn options_serialize_with_library_names() {
        let json = serde_json::to_value(ViewerOptions::default()).unwrap();
        assert_eq!(json["gallery"], "#photoswipe-gallery");
        assert_eq!(json["bgOpacity"], 0.95);
        assert_eq!(json["preload"], serde_json::json!([1, 2]));
        assert_eq!(json["counter"], true);
        assert_eq!(json["zoom"], true);
        assert_eq!(json["clickToCloseNonZoomable"], false);
    }

    #[test]
    fn second_open_while_showing_is_ignored() {
        let viewer = RefCell::new(viewer(3));
        let lightbox = CountingLightbox::default();

        assert!(matches!(open_in(&viewer, &lightbox, 1), OpenOutcome::Opened { index: 1, .. }));
        assert_eq!(open_in(&viewer, &lightbox, 2), OpenOutcome::AlreadyOpen { index: 1 });
        assert_eq!(lightbox.opens.get(), 1);

        viewer.borrow_mut().close();
        assert!(matches!(open_in(&viewer, &lightbox, 2), OpenOutcome::Opened { index: 2, .. }));
        assert_eq!(lightbox.opens.get(), 2);
    }

    #[test]
    fn failed_library_open_releases_the_overlay() {
        let viewer = RefCell::new(viewer(1));
        let lightbox = CountingLightbox {
            fail: true,
            ..Default::default()
        };
        assert!(matches!(open_in(&viewer, &lightbox, 0), OpenOutcome::Failed(_)));
        assert!(!viewer.borrow().is_open());
    }

    #[test]
    fn refused_open_while_fading_out_does_not_lock_the_viewer() {
        let viewer = RefCell::new(viewer(2));
        let lightbox = CountingLightbox {
            refusals: Cell::new(1),
            ..Default::default()
        };

        assert!(matches!(
            open_in(&viewer, &lightbox, 0),
            OpenOutcome::Failed(InvitationError::BrowserCall { .. })
        ));
        assert!(!viewer.borrow().is_open());

        assert!(matches!(open_in(&viewer, &lightbox, 1), OpenOutcome::Opened { index: 1, .. }));
        assert_eq!(lightbox.opens.get(), 1);
    }

    #[test]
    fn out_of_range_open_is_rejected() {
        let mut viewer = viewer(2);
        assert_eq!(viewer.open_at(2), OpenOutcome::OutOfRange { index: 2, len: 2 });
        assert!(!viewer.is_open());
    }

    #[test]
    fn decoded_size_replaces_placeholder() {
        let mut viewer = viewer(2);
        viewer.open_at(0);
        let request = viewer.request_metadata(1).unwrap();
        assert_eq!(
            viewer.on_image_metadata(&request, Ok((1600, 2400))),
            MetadataOutcome::Applied { width: 1600, height: 2400 }
        );
        assert_eq!(viewer.image(1).map(|i| (i.width, i.height)), Some((1600, 2400)));
    }

    #[test]
    fn failed_or_empty_decode_keeps_placeholder() {
        let mut viewer = viewer(1);
        viewer.open_at(0);
        let request = viewer.request_metadata(0).unwrap();
        let failure = InvitationError::media_unavailable("image 0", "decode error");
        assert_eq!(
            viewer.on_image_metadata(&request, Err(failure)),
            MetadataOutcome::KeptPlaceholder
        );
        assert_eq!(
            viewer.on_image_metadata(&request, Ok((0, 0))),
            MetadataOutcome::KeptPlaceholder
        );
        assert_eq!(viewer.image(0).map(|i| (i.width, i.height)), Some((4000, 3000)));
    }

    #[test]
    fn decode_after_close_is_discarded() {
        let mut viewer = viewer(1);
        viewer.open_at(0);
        let request = viewer.request_metadata(0).unwrap();
        viewer.close();
        assert_eq!(
            viewer.on_image_metadata(&request, Ok((800, 600))),
            MetadataOutcome::Discarded
        );

        // A later overlay does not revive the old request either.
        viewer.open_at(0);
        assert_eq!(
            viewer.on_image_metadata(&request, Ok((800, 600))),
            MetadataOutcome::Discarded
        );
        assert_eq!(viewer.image(0).map(|i| i.width), Some(4000));
    }

    #[test]
    fn no_metadata_requests_while_closed() {
        let viewer = viewer(1);
        assert!(viewer.request_metadata(0).is_none());
    }
}
