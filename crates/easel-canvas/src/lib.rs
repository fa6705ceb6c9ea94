//! Easel Canvas - Slide Canvas Data Model
//!
//! This crate provides the canvas layer for Easel:
//! - Element: Canvas element types (text, image, shape, media, templates)
//! - Canvas: The live element collection and its editing operations
//! - Snapshot: Serializable project and autosave state with lenient decode
//! - Session: Editing context (selection, tool, clipboard, change tracking)
//! - Events: Editor event types for activity logging
//! - Renderer: HTML export of a canvas
//! - Error: Error types for canvas operations
//!
//! ## Features
//!
//! - Typed element model with per-kind default styling and z-order
//! - Background templates pinned beneath all other content
//! - Zoom, alignment, duplication, and layer reordering
//! - Snapshot round-trips that skip unreadable elements instead of failing
//! - Change fingerprinting so autosave only runs when something changed
//!
//! ## Usage
//!
//! ```ignore
//! use easel_canvas::{Canvas, CanvasElement, ProjectSnapshot};
//!
//! let mut canvas = Canvas::new();
//! canvas.add_element(CanvasElement::text("Hello", 10.0, 20.0))?;
//!
//! let snapshot = ProjectSnapshot::capture(&canvas, "My Deck");
//! let restored = snapshot.restore();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod canvas;
pub mod element;
pub mod error;
pub mod events;
pub mod renderer;
pub mod session;
pub mod snapshot;

// Re-export main types
pub use canvas::{Alignment, Canvas};
pub use element::{
    CanvasElement, ElementContent, ElementKind, Geometry, ImageFilter, ImageStyle, ShapeKind,
    TextAlign, TextStyle,
};
pub use error::{Error, Result};
pub use events::{EditorEvent, EditorEventType, EventRecorder};
pub use renderer::CanvasRenderer;
pub use session::{EditorSession, Tool};
pub use snapshot::{CanvasState, ProjectSnapshot, SCHEMA_VERSION};
