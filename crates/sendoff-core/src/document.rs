//! The document seam.
//!
//! Controllers never touch the DOM directly. They go through [`Document`],
//! which the browser runtime implements over `web-sys` and tests implement
//! with [`MemoryDocument`](crate::MemoryDocument).

use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element.
///
/// Handles are non-owning: holding one does not keep the element alive, and
/// a handle whose element left the document simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Create a handle from a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operations the page controllers need from a document.
///
/// Mutating calls on handles that no longer resolve are silently ignored,
/// mirroring how detached DOM nodes behave.
pub trait Document {
    /// Size of the layout viewport.
    fn viewport(&self) -> Size;

    /// The `<body>` element.
    fn body(&self) -> ElementId;

    /// Whether the element is attached to the document.
    fn is_attached(&self, element: ElementId) -> bool;

    /// Viewport-relative bounding box of an attached element.
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Concatenated text of the element and its descendants.
    fn text_content(&self, element: ElementId) -> Option<String>;

    /// Whether `element` is `ancestor` or one of its descendants.
    fn is_within(&self, element: ElementId, ancestor: ElementId) -> bool;

    /// Nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, element: ElementId, class: &str) -> Option<ElementId>;

    /// Whether the element carries `class`.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Read an attribute.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Create a detached element with the given tag and class list.
    fn create_element(&mut self, tag: &str, class: &str) -> ElementId;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Detach an element (and its subtree) from the document.
    fn remove(&mut self, element: ElementId);

    /// Replace all children with a single text node.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Replace all children with parsed markup.
    fn set_inner_html(&mut self, element: ElementId, html: &str);

    /// Set an attribute.
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// Remove an attribute.
    fn remove_attribute(&mut self, element: ElementId, name: &str);

    /// Add a class.
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Remove a class.
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Move a fixed-position element so its top-left corner is at `origin`.
    fn set_position(&mut self, element: ElementId, origin: Point);

    /// Open `url` in a new browsing context.
    fn open_in_new_context(&mut self, url: &str);
}
