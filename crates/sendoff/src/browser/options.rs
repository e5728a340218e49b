//! Options passed to the browser app as JSON.

use sendoff_core::api::GENERATE_PATH;
use sendoff_widgets::TooltipConfig;
use serde::{Deserialize, Serialize};

/// Page wiring and controller settings.
///
/// Every field is optional in the JSON; missing ones take the defaults that
/// match the site's markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    /// Tooltip settings
    pub tooltip: TooltipConfig,
    /// Selector for newsletter archive links
    pub newsletter_links: String,
    /// `id` of the newsletter display region
    pub newsletter_display: String,
    /// `id` of the "Generate Idea" button
    pub generate_button: String,
    /// `id` of the idea output region
    pub idea_output: String,
    /// URL the idea panel posts to
    pub generate_endpoint: String,
    /// Console log level: off, error, warn, info, debug or trace
    pub log_level: String,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            tooltip: TooltipConfig::default(),
            newsletter_links: ".newsletter-links a".to_string(),
            newsletter_display: "newsletter-display".to_string(),
            generate_button: "generateAiContent".to_string(),
            idea_output: "aiOutput".to_string(),
            generate_endpoint: GENERATE_PATH.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppOptions {
    /// Parse options; `None` or blank input yields the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, serde_json::Error> {
        match json.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(json) => serde_json::from_str(json),
        }
    }

    /// Parsed log level, `Info` when unrecognized.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_markup() {
        let options = AppOptions::default();
        assert_eq!(options.generate_button, "generateAiContent");
        assert_eq!(options.idea_output, "aiOutput");
        assert_eq!(options.newsletter_display, "newsletter-display");
        assert_eq!(options.generate_endpoint, "/.netlify/functions/generate-ai-content");
    }

    #[test]
    fn test_missing_or_blank_json() {
        assert_eq!(AppOptions::from_json(None).expect("none"), AppOptions::default());
        assert_eq!(AppOptions::from_json(Some("  ")).expect("blank"), AppOptions::default());
    }

    #[test]
    fn test_partial_json() {
        let options = AppOptions::from_json(Some(
            r#"{"tooltip": {"transition_timeout_ms": 250}, "log_level": "debug"}"#,
        ))
        .expect("parse");
        assert_eq!(options.tooltip.transition_timeout_ms, 250);
        assert_eq!(options.tooltip.trigger_class, "tooltip-trigger");
        assert_eq!(options.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_json() {
        assert!(AppOptions::from_json(Some("{not json")).is_err());
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let options = AppOptions {
            log_level: "chatty".into(),
            ..AppOptions::default()
        };
        assert_eq!(options.log_level(), log::LevelFilter::Info);
    }
}
