//! Newsletter archive loader.
//!
//! Clicking a link marks it active and loads the HTML fragment named by its
//! `data-newsletter-path` attribute into the display region. Only the most
//! recent request may update the display.

use crate::fetch::FetchError;
use sendoff_core::{Document, ElementId};

/// Class carried by the selected link.
pub const ACTIVE_CLASS: &str = "active-newsletter";
/// Attribute naming the fragment to load.
pub const PATH_ATTRIBUTE: &str = "data-newsletter-path";

const LOADING_HTML: &str =
    r#"<div class="spinner"></div><p class="newsletter-status">Loading newsletter...</p>"#;
const FAILED_HTML: &str = r#"<p class="newsletter-status newsletter-error">Failed to load newsletter content. Please try again later.</p>"#;

/// A fragment fetch the host must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Path to fetch
    pub path: String,
    sequence: u64,
}

/// Loader state for one archive page.
#[derive(Debug, Clone)]
pub struct NewsletterLoader {
    display: ElementId,
    links: Vec<ElementId>,
    sequence: u64,
    pending: Option<u64>,
}

impl NewsletterLoader {
    /// Create a loader rendering into `display`.
    #[must_use]
    pub fn new(display: ElementId, links: Vec<ElementId>) -> Self {
        Self {
            display,
            links,
            sequence: 0,
            pending: None,
        }
    }

    /// Links managed by this loader.
    #[must_use]
    pub fn links(&self) -> &[ElementId] {
        &self.links
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Select `link`.
    ///
    /// Returns the fetch to perform, or `None` for a link without a path.
    pub fn select<D: Document + ?Sized>(&mut self, doc: &mut D, link: ElementId) -> Option<LoadRequest> {
        for &other in &self.links {
            doc.remove_class(other, ACTIVE_CLASS);
        }
        doc.add_class(link, ACTIVE_CLASS);

        let path = doc
            .attribute(link, PATH_ATTRIBUTE)
            .filter(|p| !p.trim().is_empty());
        let Some(path) = path else {
            log::debug!("newsletter: link {link} has no {PATH_ATTRIBUTE}");
            return None;
        };

        self.sequence += 1;
        self.pending = Some(self.sequence);
        doc.set_inner_html(self.display, LOADING_HTML);
        log::info!("newsletter: loading {path}");

        Some(LoadRequest {
            path,
            sequence: self.sequence,
        })
    }

    /// Apply the result of `request`.
    ///
    /// Returns `false` if a newer selection superseded the request.
    pub fn finish<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        request: &LoadRequest,
        result: Result<String, FetchError>,
    ) -> bool {
        if self.pending != Some(request.sequence) {
            log::debug!("newsletter: dropping superseded result for {}", request.path);
            return false;
        }
        self.pending = None;
        match result {
            Ok(html) => doc.set_inner_html(self.display, &html),
            Err(e) => {
                log::error!("newsletter: error loading {}: {e}", request.path);
                doc.set_inner_html(self.display, FAILED_HTML);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendoff_core::{MemoryDocument, Rect};

    struct Page {
        doc: MemoryDocument,
        display: ElementId,
        first: ElementId,
        second: ElementId,
        bare: ElementId,
    }

    fn page() -> Page {
        let mut doc = MemoryDocument::default();
        let display = doc.add("div", "", "", Rect::new(0.0, 200.0, 800.0, 400.0));
        let first = doc.add("a", "", "Issue 1", Rect::new(0.0, 0.0, 80.0, 20.0));
        doc.set_attribute(first, PATH_ATTRIBUTE, "newsletters/issue-1.html");
        let second = doc.add("a", "", "Issue 2", Rect::new(0.0, 30.0, 80.0, 20.0));
        doc.set_attribute(second, PATH_ATTRIBUTE, "newsletters/issue-2.html");
        let bare = doc.add("a", "", "Coming soon", Rect::new(0.0, 60.0, 80.0, 20.0));
        Page {
            doc,
            display,
            first,
            second,
            bare,
        }
    }

    fn loader(p: &Page) -> NewsletterLoader {
        NewsletterLoader::new(p.display, vec![p.first, p.second, p.bare])
    }

    #[test]
    fn test_select_marks_only_clicked_link_active() {
        let mut p = page();
        let mut loader = loader(&p);
        let _ = loader.select(&mut p.doc, p.first);
        let _ = loader.select(&mut p.doc, p.second);
        assert!(!p.doc.has_class(p.first, ACTIVE_CLASS));
        assert!(p.doc.has_class(p.second, ACTIVE_CLASS));
    }

    #[test]
    fn test_select_shows_loading_state() {
        let mut p = page();
        let mut loader = loader(&p);
        let request = loader.select(&mut p.doc, p.first).expect("request");
        assert_eq!(request.path, "newsletters/issue-1.html");
        assert!(loader.is_loading());
        assert_eq!(
            p.doc.text_content(p.display).as_deref(),
            Some("Loading newsletter...")
        );
        assert!(p.doc.inner_html(p.display).is_some_and(|h| h.contains("spinner")));
    }

    #[test]
    fn test_link_without_path_only_changes_active() {
        let mut p = page();
        let mut loader = loader(&p);
        assert!(loader.select(&mut p.doc, p.bare).is_none());
        assert!(p.doc.has_class(p.bare, ACTIVE_CLASS));
        assert!(!loader.is_loading());
        assert_eq!(p.doc.text_content(p.display).as_deref(), Some(""));
    }

    #[test]
    fn test_finish_injects_fragment() {
        let mut p = page();
        let mut loader = loader(&p);
        let request = loader.select(&mut p.doc, p.first).expect("request");
        assert!(loader.finish(&mut p.doc, &request, Ok("<h2>Issue 1</h2>".into())));
        assert_eq!(p.doc.inner_html(p.display), Some("<h2>Issue 1</h2>"));
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_finish_failure_shows_message() {
        let mut p = page();
        let mut loader = loader(&p);
        let request = loader.select(&mut p.doc, p.first).expect("request");
        assert!(loader.finish(&mut p.doc, &request, Err(FetchError::Status(404))));
        assert_eq!(
            p.doc.text_content(p.display).as_deref(),
            Some("Failed to load newsletter content. Please try again later.")
        );
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let mut p = page();
        let mut loader = loader(&p);
        let old = loader.select(&mut p.doc, p.first).expect("first");
        let new = loader.select(&mut p.doc, p.second).expect("second");

        assert!(loader.finish(&mut p.doc, &new, Ok("<h2>Issue 2</h2>".into())));
        assert!(!loader.finish(&mut p.doc, &old, Ok("<h2>Issue 1</h2>".into())));
        assert_eq!(p.doc.inner_html(p.display), Some("<h2>Issue 2</h2>"));
    }

    #[test]
    fn test_finish_twice_is_ignored() {
        let mut p = page();
        let mut loader = loader(&p);
        let request = loader.select(&mut p.doc, p.first).expect("request");
        assert!(loader.finish(&mut p.doc, &request, Ok("a".into())));
        assert!(!loader.finish(&mut p.doc, &request, Ok("b".into())));
        assert_eq!(p.doc.inner_html(p.display), Some("a"));
    }
}
