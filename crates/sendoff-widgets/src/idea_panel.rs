//! "Generate Idea" panel backed by the AI content endpoint.

use crate::fetch::{FetchError, HttpReply};
use sendoff_core::api::GenerateRequest;
use sendoff_core::{Document, ElementId};
use serde_json::Value;

/// Prompt sent on every click.
pub const PROMPT: &str = "Generate a short, inspiring quote about the future of technology and humanity, no more than 20 words.";

const IDLE_LABEL: &str = "Generate Idea";
const BUSY_LABEL: &str = "Generating...";
const SPINNER_HTML: &str = r#"<div class="spinner"></div>"#;
const INVALID_REPLY: &str = "Could not get a valid response from the AI function.";
const CONNECT_FAILED: &str =
    "Failed to connect to the AI service. Check your network or try again later.";

/// Button plus output region.
#[derive(Debug, Clone)]
pub struct IdeaPanel {
    button: ElementId,
    output: ElementId,
    in_flight: bool,
}

impl IdeaPanel {
    /// Create a panel.
    #[must_use]
    pub const fn new(button: ElementId, output: ElementId) -> Self {
        Self {
            button,
            output,
            in_flight: false,
        }
    }

    /// The "Generate Idea" button.
    #[must_use]
    pub const fn button(&self) -> ElementId {
        self.button
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start a request.
    ///
    /// Returns the JSON body to POST, or `None` while a request is already
    /// outstanding.
    pub fn begin<D: Document + ?Sized>(&mut self, doc: &mut D) -> Option<String> {
        if self.in_flight {
            log::debug!("idea panel: request already in flight");
            return None;
        }
        let body = match serde_json::to_string(&GenerateRequest::new(PROMPT)) {
            Ok(body) => body,
            Err(e) => {
                log::error!("idea panel: could not encode request: {e}");
                return None;
            }
        };
        self.in_flight = true;
        doc.set_inner_html(self.output, SPINNER_HTML);
        doc.set_attribute(self.button, "disabled", "");
        doc.set_text(self.button, BUSY_LABEL);
        Some(body)
    }

    /// Render the outcome of the request started by [`IdeaPanel::begin`].
    pub fn finish<D: Document + ?Sized>(&mut self, doc: &mut D, outcome: Result<HttpReply, FetchError>) {
        if !self.in_flight {
            return;
        }
        match outcome.and_then(interpret) {
            Ok(Ok(text)) => self.render(doc, "", &text),
            Ok(Err(message)) => {
                log::warn!("idea panel: {message}");
                self.render(doc, "error", &format!("Error: {message}"));
            }
            Err(e) => {
                log::error!("idea panel: {e}");
                self.render(doc, "error", &format!("Error: {CONNECT_FAILED}"));
            }
        }
        doc.remove_attribute(self.button, "disabled");
        doc.set_text(self.button, IDLE_LABEL);
        self.in_flight = false;
    }

    fn render<D: Document + ?Sized>(&self, doc: &mut D, class: &str, text: &str) {
        doc.set_text(self.output, "");
        let paragraph = doc.create_element("p", class);
        doc.set_text(paragraph, text);
        doc.append_child(self.output, paragraph);
    }
}

/// Generated text, or the message the endpoint reported.
fn interpret(reply: HttpReply) -> Result<Result<String, String>, FetchError> {
    let value: Value =
        serde_json::from_str(&reply.body).map_err(|e| FetchError::Body(e.to_string()))?;
    let text = value
        .get("generatedText")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty());
    if let (true, Some(text)) = (reply.is_success(), text) {
        return Ok(Ok(text.to_string()));
    }
    let message = value
        .get("error")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
        .unwrap_or(INVALID_REPLY);
    Ok(Err(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendoff_core::{MemoryDocument, Rect};

    fn setup() -> (MemoryDocument, IdeaPanel) {
        let mut doc = MemoryDocument::default();
        let button = doc.add("button", "", IDLE_LABEL, Rect::new(0.0, 0.0, 120.0, 32.0));
        let output = doc.add("div", "", "", Rect::new(0.0, 40.0, 400.0, 80.0));
        (doc, IdeaPanel::new(button, output))
    }

    fn output_text(doc: &MemoryDocument, panel: &IdeaPanel) -> String {
        doc.text_content(panel.output).unwrap_or_default()
    }

    #[test]
    fn test_begin_sets_busy_state() {
        let (mut doc, mut panel) = setup();
        let body = panel.begin(&mut doc).expect("body");
        let parsed: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(parsed["prompt"], PROMPT);
        assert!(panel.in_flight());
        assert_eq!(doc.text_content(panel.button).as_deref(), Some(BUSY_LABEL));
        assert!(doc.attribute(panel.button, "disabled").is_some());
        assert_eq!(doc.inner_html(panel.output), Some(SPINNER_HTML));
    }

    #[test]
    fn test_begin_ignored_while_in_flight() {
        let (mut doc, mut panel) = setup();
        assert!(panel.begin(&mut doc).is_some());
        assert!(panel.begin(&mut doc).is_none());
    }

    #[test]
    fn test_success_renders_text() {
        let (mut doc, mut panel) = setup();
        let _ = panel.begin(&mut doc);
        panel.finish(
            &mut doc,
            Ok(HttpReply::new(200, r#"{"generatedText":"Build the future kindly."}"#)),
        );
        assert_eq!(output_text(&doc, &panel), "Build the future kindly.");
        assert!(!panel.in_flight());
        assert_eq!(doc.text_content(panel.button).as_deref(), Some(IDLE_LABEL));
        assert!(doc.attribute(panel.button, "disabled").is_none());
    }

    #[test]
    fn test_markup_in_reply_is_not_parsed() {
        let (mut doc, mut panel) = setup();
        let _ = panel.begin(&mut doc);
        panel.finish(&mut doc, Ok(HttpReply::new(200, r#"{"generatedText":"<b>bold</b>"}"#)));
        assert_eq!(output_text(&doc, &panel), "<b>bold</b>");
    }

    #[test]
    fn test_error_field_is_shown() {
        let (mut doc, mut panel) = setup();
        let _ = panel.begin(&mut doc);
        panel.finish(
            &mut doc,
            Ok(HttpReply::new(400, r#"{"error":"Prompt is required in the request body."}"#)),
        );
        assert_eq!(
            output_text(&doc, &panel),
            "Error: Prompt is required in the request body."
        );
    }

    #[test]
    fn test_unexpected_shape() {
        let (mut doc, mut panel) = setup();
        let _ = panel.begin(&mut doc);
        panel.finish(&mut doc, Ok(HttpReply::new(200, r#"{"something":"else"}"#)));
        assert_eq!(
            output_text(&doc, &panel),
            "Error: Could not get a valid response from the AI function."
        );
    }

    #[test]
    fn test_non_json_body_counts_as_connect_failure() {
        let (mut doc, mut panel) = setup();
        let _ = panel.begin(&mut doc);
        panel.finish(&mut doc, Ok(HttpReply::new(502, "Bad Gateway")));
        assert_eq!(
            output_text(&doc, &panel),
            "Error: Failed to connect to the AI service. Check your network or try again later."
        );
    }

    #[test]
    fn test_network_failure() {
        let (mut doc, mut panel) = setup();
        let _ = panel.begin(&mut doc);
        panel.finish(&mut doc, Err(FetchError::Network("offline".into())));
        assert!(output_text(&doc, &panel).starts_with("Error: Failed to connect"));
        assert!(!panel.in_flight());
    }

    #[test]
    fn test_finish_without_begin_is_ignored() {
        let (mut doc, mut panel) = setup();
        panel.finish(&mut doc, Ok(HttpReply::new(200, r#"{"generatedText":"x"}"#)));
        assert_eq!(output_text(&doc, &panel), "");
    }
}
