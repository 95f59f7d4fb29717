//! Adapter interfaces between the pure core and a page.
//!
//! The browser implementation lives in `io::dom`; [`MemoryDom`] is an
//! in-memory page for driving the core without a rendering environment.

use indexmap::IndexMap;

use crate::error::{InvitationError, Result};

/// Text-level access used by field binding.
pub trait TextDom {
    type Node;

    /// The `[contenteditable="false"]` text slot inside the element whose
    /// `data-node-id` is `node_id`.
    fn text_slot(&self, node_id: &str) -> Result<Self::Node>;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn title(&self) -> String;

    fn set_title(&mut self, title: &str);
}

/// An `<img>` inside the album, with the element a click should land on
/// (its slide or thumbnail).
#[derive(Clone, Debug, PartialEq)]
pub struct ImageNode<N> {
    pub src: String,
    pub alt: Option<String>,
    pub target: N,
}

/// A standalone photo tile (`.photo-bg-wrap`).
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoTile<N> {
    /// Inline `background-image` value, e.g. `url("https://...")`.
    pub background_image: Option<String>,
    /// Nested inside the album region; the album pass already covers it.
    pub inside_album: bool,
    /// Closest ancestor carrying `data-node-id`.
    pub container: Option<TileContainer<N>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TileContainer<N> {
    pub node: N,
    /// Container is marked `component-locked` and takes no clicks.
    pub locked: bool,
}

/// Read access used by the gallery indexer. All lists are in DOM order.
pub trait GalleryDom {
    type Node: Clone;

    fn album_slide_images(&self) -> Vec<ImageNode<Self::Node>>;

    fn album_thumbnail_images(&self) -> Vec<ImageNode<Self::Node>>;

    fn photo_tiles(&self) -> Vec<PhotoTile<Self::Node>>;
}

// --- MemoryDom ---

pub type NodeId = usize;

#[derive(Debug)]
struct MemoryTextTarget {
    slot: Option<NodeId>,
    text: String,
}

/// In-memory page with just enough structure for binding and gallery work.
#[derive(Debug, Default)]
pub struct MemoryDom {
    title: String,
    next_node: NodeId,
    text_targets: IndexMap<String, MemoryTextTarget>,
    slides: Vec<ImageNode<NodeId>>,
    thumbnails: Vec<ImageNode<NodeId>>,
    tiles: Vec<PhotoTile<NodeId>>,
    text_writes: usize,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> NodeId {
        self.next_node += 1;
        self.next_node
    }

    /// Element with a `[contenteditable="false"]` slot holding `text`.
    pub fn add_text_target(&mut self, node_id: &str, text: &str) -> NodeId {
        let slot = self.allocate();
        self.text_targets.insert(
            node_id.to_string(),
            MemoryTextTarget {
                slot: Some(slot),
                text: text.to_string(),
            },
        );
        slot
    }

    /// Element carrying `data-node-id` but no editable text slot.
    pub fn add_bare_element(&mut self, node_id: &str) {
        self.text_targets.insert(
            node_id.to_string(),
            MemoryTextTarget {
                slot: None,
                text: String::new(),
            },
        );
    }

    pub fn text(&self, node_id: &str) -> Option<&str> {
        self.text_targets
            .get(node_id)
            .filter(|target| target.slot.is_some())
            .map(|target| target.text.as_str())
    }

    /// Number of `set_text` calls so far.
    pub fn text_writes(&self) -> usize {
        self.text_writes
    }

    /// Album slide image; returns the slide element.
    pub fn add_slide(&mut self, src: &str, alt: Option<&str>) -> NodeId {
        let target = self.allocate();
        self.slides.push(ImageNode {
            src: src.to_string(),
            alt: alt.map(str::to_string),
            target,
        });
        target
    }

    /// Album thumbnail image; returns the thumbnail element.
    pub fn add_thumbnail(&mut self, src: &str) -> NodeId {
        let target = self.allocate();
        self.thumbnails.push(ImageNode {
            src: src.to_string(),
            alt: None,
            target,
        });
        target
    }

    /// Standalone tile showing `url`; returns its clickable container.
    pub fn add_tile(&mut self, url: &str) -> NodeId {
        self.push_tile(Some(css_url(url)), false, Some(false))
    }

    /// Tile whose container is `component-locked`.
    pub fn add_locked_tile(&mut self, url: &str) -> NodeId {
        self.push_tile(Some(css_url(url)), false, Some(true))
    }

    /// Tile nested inside the album region.
    pub fn add_album_tile(&mut self, url: &str) -> NodeId {
        self.push_tile(Some(css_url(url)), true, Some(false))
    }

    /// Tile with no `data-node-id` ancestor.
    pub fn add_tile_without_container(&mut self, url: &str) {
        self.push_tile(Some(css_url(url)), false, None);
    }

    /// Tile with a raw inline `background-image` value.
    pub fn add_tile_with_background(&mut self, background_image: Option<&str>) -> NodeId {
        self.push_tile(background_image.map(str::to_string), false, Some(false))
    }

    fn push_tile(
        &mut self,
        background_image: Option<String>,
        inside_album: bool,
        locked: Option<bool>,
    ) -> NodeId {
        let node = self.allocate();
        self.tiles.push(PhotoTile {
            background_image,
            inside_album,
            container: locked.map(|locked| TileContainer { node, locked }),
        });
        node
    }
}

fn css_url(url: &str) -> String {
    format!("url(\"{url}\")")
}

impl TextDom for MemoryDom {
    type Node = NodeId;

    fn text_slot(&self, node_id: &str) -> Result<NodeId> {
        let target = self.text_targets.get(node_id).ok_or_else(|| {
            InvitationError::element_not_found(format!("[data-node-id=\"{node_id}\"]"))
        })?;
        target.slot.ok_or_else(|| {
            InvitationError::element_not_found(format!(
                "[data-node-id=\"{node_id}\"] [contenteditable=\"false\"]"
            ))
        })
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.text_writes += 1;
        if let Some(target) = self
            .text_targets
            .values_mut()
            .find(|target| target.slot == Some(*node))
        {
            target.text = text.to_string();
        }
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

impl GalleryDom for MemoryDom {
    type Node = NodeId;

    fn album_slide_images(&self) -> Vec<ImageNode<NodeId>> {
        self.slides.clone()
    }

    fn album_thumbnail_images(&self) -> Vec<ImageNode<NodeId>> {
        self.thumbnails.clone()
    }

    fn photo_tiles(&self) -> Vec<PhotoTile<NodeId>> {
        self.tiles.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_slot_distinguishes_missing_element_and_missing_slot() {
        let mut dom = MemoryDom::new();
        dom.add_bare_element("bare");
        let slot = dom.add_text_target("venue_dia_chi", "…");

        assert_eq!(dom.text_slot("venue_dia_chi"), Ok(slot));
        assert_eq!(
            dom.text_slot("bare"),
            Err(InvitationError::element_not_found(
                "[data-node-id=\"bare\"] [contenteditable=\"false\"]"
            ))
        );
        assert!(dom.text_slot("nowhere").is_err());
    }

    #[test]
    fn tiles_are_serialized_as_css_urls() {
        let mut dom = MemoryDom::new();
        dom.add_tile("https://res.cloudinary.com/x/image/upload/v1/a.jpg");
        let tiles = dom.photo_tiles();
        assert_eq!(
            tiles[0].background_image.as_deref(),
            Some("url(\"https://res.cloudinary.com/x/image/upload/v1/a.jpg\")")
        );
    }
}
