//! WASM application entry point.

use super::dom::WebDocument;
use super::events::{is_modified_click, keydown_to_page};
use super::fetch;
use super::logger;
use super::options::AppOptions;
use sendoff_core::{Document, ElementId, PageEvent, Propagation};
use sendoff_widgets::{Completion, HttpReply, IdeaPanel, NewsletterLoader, TooltipController};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, EventTarget};

/// Everything the event handlers mutate.
struct Page {
    doc: WebDocument,
    tooltip: TooltipController,
    newsletter: Option<NewsletterLoader>,
    ideas: Option<IdeaPanel>,
    generate_endpoint: String,
}

type SharedPage = Rc<RefCell<Page>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Page runtime. Listeners are removed when the app is dropped.
#[wasm_bindgen]
pub struct App {
    page: SharedPage,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl App {
    /// Attach to the current page. `options` is optional JSON, see
    /// [`AppOptions`].
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<App, JsValue> {
        console_error_panic_hook::set_once();

        let options = AppOptions::from_json(options.as_deref())
            .map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))?;
        logger::init(options.log_level());

        let doc = WebDocument::new()?;
        let triggers = doc.query_all(&format!(".{}", options.tooltip.trigger_class))?;
        let links = doc.query_all(&options.newsletter_links)?;
        let newsletter = match doc.by_id(&options.newsletter_display) {
            Some(display) if !links.is_empty() => Some(NewsletterLoader::new(display, links)),
            _ => None,
        };
        let ideas = match (
            doc.by_id(&options.generate_button),
            doc.by_id(&options.idea_output),
        ) {
            (Some(button), Some(output)) => Some(IdeaPanel::new(button, output)),
            _ => None,
        };

        log::info!(
            "sendoff: {} tooltip triggers, newsletter archive: {}, idea panel: {}",
            triggers.len(),
            newsletter.is_some(),
            ideas.is_some()
        );

        let page = Rc::new(RefCell::new(Page {
            doc,
            tooltip: TooltipController::new(options.tooltip),
            newsletter,
            ideas,
            generate_endpoint: options.generate_endpoint,
        }));

        let mut app = Self {
            page,
            listeners: Vec::new(),
        };
        app.wire_tooltip(&triggers)?;
        app.wire_newsletter()?;
        app.wire_ideas()?;
        Ok(app)
    }

    /// Hide the tooltip, if one is shown.
    pub fn hide_tooltip(&self) {
        let completion = {
            let mut guard = self.page.borrow_mut();
            let page = &mut *guard;
            page.tooltip.hide(&mut page.doc)
        };
        schedule_timeout(&self.page, completion);
    }

    /// Current tooltip phase: "Hidden", "Showing", "Visible" or "Hiding".
    pub fn tooltip_phase(&self) -> String {
        format!("{:?}", self.page.borrow().tooltip.phase())
    }

    /// Text of the current tooltip.
    pub fn tooltip_text(&self) -> Option<String> {
        self.page.borrow().tooltip.text().map(str::to_string)
    }
}

impl App {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    fn element_target(&self, id: ElementId) -> Result<EventTarget, JsValue> {
        let element = self
            .page
            .borrow()
            .doc
            .element(id)
            .ok_or_else(|| JsValue::from_str(&format!("Element {id} vanished")))?;
        Ok(element.into())
    }

    fn wire_tooltip(&mut self, triggers: &[ElementId]) -> Result<(), JsValue> {
        for &trigger in triggers {
            let target = self.element_target(trigger)?;
            let page = Rc::clone(&self.page);
            self.listen(&target, "click", move |event| {
                let reaction = {
                    let mut guard = page.borrow_mut();
                    let p = &mut *guard;
                    p.tooltip.on_trigger_click(&mut p.doc, trigger)
                };
                if reaction.propagation == Propagation::Stop {
                    event.stop_propagation();
                }
                schedule_timeout(&page, reaction.completion);
            })?;
        }

        let (window, document): (EventTarget, EventTarget) = {
            let page = self.page.borrow();
            (page.doc.window().clone().into(), page.doc.dom().clone().into())
        };

        let page = Rc::clone(&self.page);
        self.listen(&document, "click", move |event| {
            let completion = {
                let mut guard = page.borrow_mut();
                let p = &mut *guard;
                let (target, fresh) = p
                    .doc
                    .event_target(&event)
                    .unwrap_or((p.doc.body(), false));
                let reaction = p.tooltip.handle_event(&mut p.doc, &PageEvent::Click { target });
                // A trigger added after startup stays registered as the anchor
                if fresh && p.tooltip.anchor() != Some(target) {
                    p.doc.forget(target);
                }
                reaction.completion
            };
            schedule_timeout(&page, completion);
        })?;

        let page = Rc::clone(&self.page);
        self.listen(&document, "keydown", move |event| {
            let Some(page_event) = keydown_to_page(&event) else {
                return;
            };
            dispatch(&page, &page_event);
        })?;

        let page = Rc::clone(&self.page);
        self.listen(&window, "scroll", move |_| {
            dispatch(&page, &PageEvent::Scroll);
        })?;

        let page = Rc::clone(&self.page);
        self.listen(&document, "transitionend", move |event| {
            let target = page.borrow().doc.known_target(&event);
            if let Some(target) = target {
                dispatch(&page, &PageEvent::TransitionEnd { target });
            }
        })?;

        Ok(())
    }

    fn wire_newsletter(&mut self) -> Result<(), JsValue> {
        let links = match &self.page.borrow().newsletter {
            Some(loader) => loader.links().to_vec(),
            None => return Ok(()),
        };
        for link in links {
            let target = self.element_target(link)?;
            let page = Rc::clone(&self.page);
            self.listen(&target, "click", move |event| {
                if is_modified_click(&event) {
                    return;
                }
                event.prevent_default();
                let request = {
                    let mut guard = page.borrow_mut();
                    let p = &mut *guard;
                    match p.newsletter.as_mut() {
                        Some(loader) => loader.select(&mut p.doc, link),
                        None => None,
                    }
                };
                let Some(request) = request else {
                    return;
                };
                let page = Rc::clone(&page);
                spawn_local(async move {
                    let result = fetch::get(&request.path)
                        .await
                        .and_then(HttpReply::into_text);
                    let mut guard = page.borrow_mut();
                    let p = &mut *guard;
                    if let Some(loader) = p.newsletter.as_mut() {
                        loader.finish(&mut p.doc, &request, result);
                    }
                });
            })?;
        }
        Ok(())
    }

    fn wire_ideas(&mut self) -> Result<(), JsValue> {
        let Some(button) = self.page.borrow().ideas.as_ref().map(IdeaPanel::button) else {
            return Ok(());
        };
        let target = self.element_target(button)?;
        let page = Rc::clone(&self.page);
        self.listen(&target, "click", move |_| {
            let (body, endpoint) = {
                let mut guard = page.borrow_mut();
                let p = &mut *guard;
                let body = match p.ideas.as_mut() {
                    Some(panel) => panel.begin(&mut p.doc),
                    None => None,
                };
                (body, p.generate_endpoint.clone())
            };
            let Some(body) = body else {
                return;
            };
            let page = Rc::clone(&page);
            spawn_local(async move {
                let outcome = fetch::post_json(&endpoint, &body).await;
                let mut guard = page.borrow_mut();
                let p = &mut *guard;
                if let Some(panel) = p.ideas.as_mut() {
                    panel.finish(&mut p.doc, outcome);
                }
            });
        })
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for listener in &self.listeners {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Route a document-level event to the tooltip.
fn dispatch(page: &SharedPage, event: &PageEvent) {
    let completion = {
        let mut guard = page.borrow_mut();
        let p = &mut *guard;
        p.tooltip.handle_event(&mut p.doc, event).completion
    };
    schedule_timeout(page, completion);
}

/// Resolve `completion` after the transition timeout unless `transitionend`
/// got there first.
fn schedule_timeout(page: &SharedPage, completion: Option<Completion>) {
    let Some(completion) = completion else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let timeout = page.borrow().tooltip.config().transition_timeout_ms;
    let page = Rc::clone(page);
    let callback = Closure::once_into_js(move || {
        let mut guard = page.borrow_mut();
        let p = &mut *guard;
        if p.tooltip.complete(&mut p.doc, completion) {
            log::debug!("tooltip: {:?} resolved by timeout", completion.phase());
        }
    });
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        i32::try_from(timeout).unwrap_or(i32::MAX),
    ) {
        log::warn!("tooltip: could not schedule transition timeout: {e:?}");
    }
}
