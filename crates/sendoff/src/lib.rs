//! Sendoff: browser runtime for the Sendoff newsletter site.
//!
//! Wires the page controllers from [`widgets`] to the live DOM: glossary
//! tooltips with a web-search action, the newsletter archive loader, and the
//! AI "Generate Idea" panel.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { App } from './sendoff.js';
//!
//! async function main() {
//!     await init();
//!     const app = new App(JSON.stringify({ tooltip: { transition_timeout_ms: 300 } }));
//! }
//! ```

pub use sendoff_core::*;
pub use sendoff_widgets as widgets;

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{App, WebDocument};

pub use browser::AppOptions;
