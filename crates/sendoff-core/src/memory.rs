//! In-memory [`Document`] for tests and headless use.

use crate::document::{Document, ElementId};
use crate::geometry::{Point, Rect, Size};
use std::collections::BTreeMap;

const BODY: ElementId = ElementId(0);

// Layout approximation for elements without an explicit size.
const TEXT_SIZE: f32 = 14.0;
const CHAR_WIDTH: f32 = TEXT_SIZE * 0.6;
const LINE_HEIGHT: f32 = TEXT_SIZE * 1.2;
const PADDING: f32 = 8.0;
const MAX_TEXT_WIDTH: f32 = 250.0;

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    html: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    origin: Point,
    fixed_size: Option<Size>,
}

impl Node {
    fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: class.split_whitespace().map(str::to_string).collect(),
            attributes: BTreeMap::new(),
            text: String::new(),
            html: None,
            parent: None,
            children: Vec::new(),
            origin: Point::ORIGIN,
            fixed_size: None,
        }
    }
}

/// A document tree kept entirely in memory.
///
/// Elements added with [`MemoryDocument::add`] have fixed rectangles; elements
/// created through [`Document::create_element`] are sized from their text with
/// a fixed-width font approximation, capped at 250px of text per line.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    viewport: Size,
    nodes: Vec<Node>,
    opened: Vec<String>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl MemoryDocument {
    /// Create an empty document with the given viewport.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let mut body = Node::new("body", "");
        body.fixed_size = Some(Size::new(width, height));
        Self {
            viewport: Size::new(width, height),
            nodes: vec![body],
            opened: Vec::new(),
        }
    }

    /// Append an element with a fixed rectangle to `<body>`.
    pub fn add(&mut self, tag: &str, class: &str, text: &str, rect: Rect) -> ElementId {
        let id = self.create_element(tag, class);
        if let Some(node) = self.node_mut(id) {
            node.text = text.to_string();
            node.origin = rect.origin();
            node.fixed_size = Some(rect.size());
        }
        self.append_child(BODY, id);
        id
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
    }

    /// Attached elements carrying `class`, in creation order.
    #[must_use]
    pub fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        (0..self.nodes.len() as u64)
            .map(ElementId)
            .filter(|&id| self.is_attached(id) && self.has_class(id, class))
            .collect()
    }

    /// Markup last assigned with [`Document::set_inner_html`].
    #[must_use]
    pub fn inner_html(&self, element: ElementId) -> Option<&str> {
        self.node(element)?.html.as_deref()
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.node(element).map(|n| n.tag.as_str())
    }

    /// Children of an element.
    #[must_use]
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.node(element).map_or(&[], |n| n.children.as_slice())
    }

    /// URLs passed to [`Document::open_in_new_context`], oldest first.
    #[must_use]
    pub fn opened_urls(&self) -> &[String] {
        &self.opened
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn clear_children(&mut self, id: ElementId) {
        let children = self
            .node_mut(id)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
    }

    /// Text lines an element contributes, one entry per text-bearing node.
    fn text_lines(&self, id: ElementId, out: &mut Vec<f32>) {
        let Some(node) = self.node(id) else {
            return;
        };
        let own = node
            .html
            .as_deref()
            .map_or_else(|| node.text.clone(), strip_tags);
        if !own.trim().is_empty() {
            out.push(own.chars().count() as f32 * CHAR_WIDTH);
        }
        for &child in &node.children {
            self.text_lines(child, out);
        }
    }

    fn estimate_size(&self, id: ElementId) -> Size {
        let mut lines = Vec::new();
        self.text_lines(id, &mut lines);
        if lines.is_empty() {
            return Size::ZERO;
        }
        let widest = lines.iter().copied().fold(0.0_f32, f32::max);
        let wrapped: f32 = lines
            .iter()
            .map(|w| (w / MAX_TEXT_WIDTH).ceil().max(1.0))
            .sum();
        Size::new(
            PADDING.mul_add(2.0, widest.min(MAX_TEXT_WIDTH)),
            PADDING.mul_add(2.0, wrapped * LINE_HEIGHT),
        )
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

impl Document for MemoryDocument {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn body(&self) -> ElementId {
        BODY
    }

    fn is_attached(&self, element: ElementId) -> bool {
        let mut current = element;
        loop {
            if current == BODY {
                return true;
            }
            match self.node(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        if !self.is_attached(element) {
            return None;
        }
        let node = self.node(element)?;
        let size = node
            .fixed_size
            .unwrap_or_else(|| self.estimate_size(element));
        Some(Rect::from_origin_size(node.origin, size))
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        let node = self.node(element)?;
        let mut text = node
            .html
            .as_deref()
            .map_or_else(|| node.text.clone(), strip_tags);
        for &child in &node.children {
            if let Some(t) = self.text_content(child) {
                text.push_str(&t);
            }
        }
        Some(text)
    }

    fn is_within(&self, element: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn closest_with_class(&self, element: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(element);
        while let Some(id) = current {
            if self.has_class(id, class) {
                return Some(id);
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        None
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attributes.get(name).cloned()
    }

    fn create_element(&mut self, tag: &str, class: &str) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node::new(tag, class));
        id
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn remove(&mut self, element: ElementId) {
        if element != BODY {
            self.detach(element);
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.clear_children(element);
        if let Some(node) = self.node_mut(element) {
            node.text = text.to_string();
            node.html = None;
        }
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) {
        self.clear_children(element);
        if let Some(node) = self.node_mut(element) {
            node.text.clear();
            node.html = Some(html.to_string());
        }
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.remove(name);
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn set_position(&mut self, element: ElementId, origin: Point) {
        if let Some(node) = self.node_mut(element) {
            node.origin = origin;
        }
    }

    fn open_in_new_context(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }
}
