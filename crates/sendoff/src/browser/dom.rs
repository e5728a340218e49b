//! [`Document`] over the live DOM.
//!
//! Elements are handed to the controllers as [`ElementId`]s. The mapping is
//! kept in a registry and stamped on the element as `data-sendoff-id`, so an
//! event target can be mapped back to its handle.

use sendoff_core::{Document, ElementId, Point, Rect, Size};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, HtmlElement, Node, Window};

const ID_ATTRIBUTE: &str = "data-sendoff-id";

/// The browser document seen through [`Document`].
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
    registry: RefCell<HashMap<u64, Element>>,
    next_id: Cell<u64>,
    body: ElementId,
}

impl WebDocument {
    /// Attach to the current window's document.
    pub fn new() -> Result<Self, JsValue> {
        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let body = document.body().ok_or("No body")?;

        let doc = Self {
            window,
            document,
            registry: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            body: ElementId::new(0),
        };
        doc.registry.borrow_mut().insert(0, body.into());
        Ok(doc)
    }

    /// Handle for `element`, registering it if needed.
    pub fn register(&self, element: &Element) -> ElementId {
        if let Some(id) = self.lookup(element) {
            return id;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let _ = element.set_attribute(ID_ATTRIBUTE, &id.to_string());
        self.registry.borrow_mut().insert(id, element.clone());
        ElementId::new(id)
    }

    /// Handle for `element` if it is already registered.
    pub fn lookup(&self, element: &Element) -> Option<ElementId> {
        if self.document.body().is_some_and(|b| {
            let body: &Element = &b;
            body == element
        }) {
            return Some(self.body);
        }
        let id: u64 = element.get_attribute(ID_ATTRIBUTE)?.parse().ok()?;
        self.registry
            .borrow()
            .get(&id)
            .filter(|known| *known == element)
            .map(|_| ElementId::new(id))
    }

    /// Drop a handle that is no longer needed.
    pub fn forget(&self, id: ElementId) {
        if id == self.body {
            return;
        }
        if let Some(element) = self.registry.borrow_mut().remove(&id.get()) {
            let _ = element.remove_attribute(ID_ATTRIBUTE);
        }
    }

    /// The element behind a handle.
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().get(&id.get()).cloned()
    }

    /// Register every element matching `selector`.
    pub fn query_all(&self, selector: &str) -> Result<Vec<ElementId>, JsValue> {
        let nodes = self.document.query_selector_all(selector)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.register(&element))
            .collect())
    }

    /// Register the element with the given `id` attribute.
    pub fn by_id(&self, id: &str) -> Option<ElementId> {
        self.document
            .get_element_by_id(id)
            .map(|element| self.register(&element))
    }

    /// Handle for an event's target element.
    ///
    /// The flag is `true` when the target was registered just now and should
    /// be [`forget`](Self::forget)-ten after dispatch.
    pub fn event_target(&self, event: &Event) -> Option<(ElementId, bool)> {
        let element = event.target()?.dyn_into::<Element>().ok()?;
        match self.lookup(&element) {
            Some(id) => Some((id, false)),
            None => Some((self.register(&element), true)),
        }
    }

    /// Handle for an event's target, without registering unknown elements.
    pub fn known_target(&self, event: &Event) -> Option<ElementId> {
        let element = event.target()?.dyn_into::<Element>().ok()?;
        self.lookup(&element)
    }

    /// The browser window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The DOM document.
    pub fn dom(&self) -> &web_sys::Document {
        &self.document
    }

    fn with_element(&self, id: ElementId, f: impl FnOnce(&Element)) {
        if let Some(element) = self.element(id) {
            f(&element);
        }
    }

    /// Number of live handles, the body included.
    pub fn registered(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Run `replace` on the children of `parent`, then drop handles to
    /// descendants it detached.
    fn replace_children(&self, parent: &Element, replace: impl FnOnce(&Element)) {
        let before: Vec<u64> = self
            .registry
            .borrow()
            .iter()
            .filter(|&(_, element)| {
                let node: &Node = element;
                element != parent && parent.contains(Some(node))
            })
            .map(|(id, _)| *id)
            .collect();

        replace(parent);

        let mut registry = self.registry.borrow_mut();
        for id in before {
            let detached = registry.get(&id).is_some_and(|element| {
                let node: &Node = element;
                !parent.contains(Some(node))
            });
            if detached {
                registry.remove(&id);
            }
        }
    }

    fn prune(&self, removed: &Element) {
        self.registry
            .borrow_mut()
            .retain(|_, element| {
                let node: &Node = element;
                !removed.contains(Some(node))
            });
    }
}

impl Document for WebDocument {
    fn viewport(&self) -> Size {
        match self.document.document_element() {
            Some(root) => Size::new(root.client_width() as f32, root.client_height() as f32),
            None => {
                let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
                let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
                Size::new(
                    width.unwrap_or_default() as f32,
                    height.unwrap_or_default() as f32,
                )
            }
        }
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.element(element).is_some_and(|e| e.is_connected())
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let element = self.element(element).filter(|e| e.is_connected())?;
        let rect = element.get_bounding_client_rect();
        Some(Rect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.element(element)?.text_content()
    }

    fn is_within(&self, element: ElementId, ancestor: ElementId) -> bool {
        match (self.element(element), self.element(ancestor)) {
            (Some(element), Some(ancestor)) => {
                let node: &Node = &element;
                ancestor.contains(Some(node))
            }
            _ => false,
        }
    }

    fn closest_with_class(&self, element: ElementId, class: &str) -> Option<ElementId> {
        let found = self
            .element(element)?
            .closest(&format!(".{class}"))
            .ok()
            .flatten()?;
        Some(self.register(&found))
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn create_element(&mut self, tag: &str, class: &str) -> ElementId {
        match self.document.create_element(tag) {
            Ok(element) => {
                element.set_class_name(class);
                self.register(&element)
            }
            Err(e) => {
                log::error!("dom: could not create <{tag}>: {e:?}");
                // A handle that resolves to nothing
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                ElementId::new(id)
            }
        }
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            if let Err(e) = parent.append_child(&child) {
                log::warn!("dom: append failed: {e:?}");
            }
        }
    }

    fn remove(&mut self, element: ElementId) {
        if element == self.body {
            return;
        }
        if let Some(el) = self.element(element) {
            el.remove();
            self.prune(&el);
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(e) = self.element(element) {
            self.replace_children(&e, |e| e.set_text_content(Some(text)));
        }
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) {
        if let Some(e) = self.element(element) {
            self.replace_children(&e, |e| e.set_inner_html(html));
        }
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        self.with_element(element, |e| {
            let _ = e.set_attribute(name, value);
        });
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        self.with_element(element, |e| {
            let _ = e.remove_attribute(name);
        });
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.with_element(element, |e| {
            let _ = e.class_list().add_1(class);
        });
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.with_element(element, |e| {
            let _ = e.class_list().remove_1(class);
        });
    }

    fn set_position(&mut self, element: ElementId, origin: Point) {
        let Some(element) = self.element(element) else {
            return;
        };
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("left", &format!("{}px", origin.x));
        let _ = style.set_property("top", &format!("{}px", origin.y));
    }

    fn open_in_new_context(&mut self, url: &str) {
        if let Err(e) =
            self.window
                .open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
        {
            log::warn!("dom: could not open {url}: {e:?}");
        }
    }
}
