//! Browser runtime for Sendoff pages.
//!
//! This module bridges the DOM-agnostic controllers to `web-sys`.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod fetch;
#[cfg(target_arch = "wasm32")]
pub mod logger;

// Cross-platform modules
pub mod options;

#[cfg(target_arch = "wasm32")]
pub use app::App;
#[cfg(target_arch = "wasm32")]
pub use dom::WebDocument;
pub use options::AppOptions;
