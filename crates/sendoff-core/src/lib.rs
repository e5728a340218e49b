//! Core types for the Sendoff site runtime.
//!
//! This crate provides the pieces every other Sendoff crate builds on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Page events: [`PageEvent`], [`Key`], [`Propagation`]
//! - The document seam: [`Document`], [`ElementId`], and the in-memory
//!   [`MemoryDocument`] used by tests
//! - Wire types for the AI content endpoint in [`api`]

pub mod api;
mod document;
mod event;
mod geometry;
mod memory;
mod uri;

pub use document::{Document, ElementId};
pub use event::{Key, PageEvent, Propagation};
pub use geometry::{Point, Rect, Size};
pub use memory::MemoryDocument;
pub use uri::encode_uri_component;
