//! Live Canvas Model
//!
//! This module holds the in-memory canvas: an ordered collection of
//! elements plus the canvas background and zoom state. The canvas is a
//! plain data model; rendering and persistence live behind separate seams.

use uuid::Uuid;

use crate::element::{CanvasElement, ElementKind, BACKGROUND_Z_ORDER};
use crate::error::{Error, Result};

/// Default canvas background (CSS color string)
pub const DEFAULT_BACKGROUND: &str = "#333";
/// Default canvas width in pixels (16:9 slide)
pub const DEFAULT_WIDTH: f64 = 960.0;
/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: f64 = 540.0;
/// Minimum zoom factor
pub const MIN_ZOOM: f64 = 0.3;
/// Maximum zoom factor
pub const MAX_ZOOM: f64 = 3.0;
/// Zoom step per in/out action
pub const ZOOM_STEP: f64 = 0.1;
/// Margin used by edge alignment, in pixels
const ALIGN_MARGIN: f64 = 10.0;
/// Offset applied to duplicated elements, in pixels
const DUPLICATE_OFFSET: f64 = 20.0;

/// Edge or center alignment targets within the canvas extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Left edge (10px margin)
    Left,
    /// Horizontal center
    Center,
    /// Right edge (10px margin)
    Right,
    /// Top edge (10px margin)
    Top,
    /// Vertical center
    Middle,
    /// Bottom edge (10px margin)
    Bottom,
}

/// The live canvas: elements in insertion order plus background and zoom
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Elements in insertion order (z-order is a per-element field)
    elements: Vec<CanvasElement>,
    /// Canvas background (CSS color string)
    background: String,
    /// Current zoom factor
    zoom: f64,
    /// Canvas extent used for alignment
    width: f64,
    /// Canvas extent used for alignment
    height: f64,
}

impl Canvas {
    /// Create an empty canvas with default background and zoom
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            background: DEFAULT_BACKGROUND.to_string(),
            zoom: 1.0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Create a canvas with a specific extent
    #[must_use]
    pub fn with_extent(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Canvas extent (width, height)
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Current background
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Replace the background color; also removes any background template,
    /// since a solid background and a template are mutually exclusive
    pub fn set_background(&mut self, background: impl Into<String>) {
        self.remove_background_template();
        self.background = background.into();
    }

    /// Current zoom factor
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the allowed range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Zoom in one step
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    /// Zoom out one step
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Number of elements, background template included
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check whether the canvas has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add an element, enforcing id uniqueness.
    ///
    /// A background template goes through [`Canvas::set_background_template`]
    /// instead so the bottom-layer uniqueness invariant holds.
    pub fn add_element(&mut self, element: CanvasElement) -> Result<Uuid> {
        if self.get(element.id).is_some() {
            return Err(Error::DuplicateId(element.id));
        }
        if element.is_background_template() {
            return Ok(self.set_background_template(element));
        }
        let id = element.id;
        self.elements.push(element);
        Ok(id)
    }

    /// Install a background template, replacing any existing one
    pub fn set_background_template(&mut self, mut element: CanvasElement) -> Uuid {
        self.remove_background_template();
        element.z_order = BACKGROUND_Z_ORDER;
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove the background template, if present
    pub fn remove_background_template(&mut self) -> Option<CanvasElement> {
        let pos = self
            .elements
            .iter()
            .position(CanvasElement::is_background_template)?;
        Some(self.elements.remove(pos))
    }

    /// The current background template, if any
    #[must_use]
    pub fn background_template(&self) -> Option<&CanvasElement> {
        self.elements
            .iter()
            .find(|e| e.is_background_template())
    }

    /// Get an element by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable element by id
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Remove an element by id
    pub fn remove(&mut self, id: Uuid) -> Option<CanvasElement> {
        let pos = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(pos))
    }

    /// Elements in insertion order
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Elements sorted ascending by z-order, background template first.
    ///
    /// The sort is stable: equal z-orders keep insertion order.
    #[must_use]
    pub fn elements_in_z_order(&self) -> Vec<&CanvasElement> {
        let mut sorted: Vec<&CanvasElement> = self.elements.iter().collect();
        sorted.sort_by_key(|e| {
            if e.is_background_template() {
                i64::MIN
            } else {
                i64::from(e.z_order)
            }
        });
        sorted
    }

    /// Duplicate an element with a fresh id, offset 20px down-right.
    ///
    /// The background template cannot be duplicated.
    pub fn duplicate(&mut self, id: Uuid) -> Result<Uuid> {
        let source = self.get(id).ok_or(Error::ElementNotFound(id))?;
        if source.is_background_template() {
            return Err(Error::BackgroundLocked);
        }
        let mut copy = source.clone().with_id(Uuid::new_v4());
        copy.translate(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        self.add_element(copy)
    }

    /// Align an element against the canvas extent
    pub fn align(&mut self, id: Uuid, alignment: Alignment) -> Result<()> {
        let (canvas_w, canvas_h) = (self.width, self.height);
        let element = self.get_mut(id).ok_or(Error::ElementNotFound(id))?;
        if element.is_background_template() {
            return Err(Error::BackgroundLocked);
        }
        let w = element.geometry.width.unwrap_or(0.0);
        let h = element.geometry.height.unwrap_or(0.0);
        match alignment {
            Alignment::Left => element.geometry.x = ALIGN_MARGIN,
            Alignment::Center => element.geometry.x = (canvas_w - w) / 2.0,
            Alignment::Right => element.geometry.x = canvas_w - w - ALIGN_MARGIN,
            Alignment::Top => element.geometry.y = ALIGN_MARGIN,
            Alignment::Middle => element.geometry.y = (canvas_h - h) / 2.0,
            Alignment::Bottom => element.geometry.y = canvas_h - h - ALIGN_MARGIN,
        }
        Ok(())
    }

    /// Raise an element above every other non-background element
    pub fn bring_to_front(&mut self, id: Uuid) -> Result<()> {
        let top = self.max_z_order();
        self.set_z(id, top + 1)
    }

    /// Lower an element beneath every other non-background element
    /// (still above the background template layer)
    pub fn send_to_back(&mut self, id: Uuid) -> Result<()> {
        let bottom = self.min_z_order();
        self.set_z(id, (bottom - 1).max(BACKGROUND_Z_ORDER + 1))
    }

    /// Raise an element one step
    pub fn move_forward(&mut self, id: Uuid) -> Result<()> {
        let z = self.get(id).ok_or(Error::ElementNotFound(id))?.z_order;
        self.set_z(id, z + 1)
    }

    /// Lower an element one step, clamped above the background layer
    pub fn move_backward(&mut self, id: Uuid) -> Result<()> {
        let z = self.get(id).ok_or(Error::ElementNotFound(id))?.z_order;
        self.set_z(id, (z - 1).max(BACKGROUND_Z_ORDER + 1))
    }

    fn set_z(&mut self, id: Uuid, z: i32) -> Result<()> {
        let element = self.get_mut(id).ok_or(Error::ElementNotFound(id))?;
        if element.is_background_template() {
            return Err(Error::BackgroundLocked);
        }
        element.z_order = z;
        Ok(())
    }

    fn max_z_order(&self) -> i32 {
        self.elements
            .iter()
            .filter(|e| !e.is_background_template())
            .map(|e| e.z_order)
            .max()
            .unwrap_or(BACKGROUND_Z_ORDER)
    }

    fn min_z_order(&self) -> i32 {
        self.elements
            .iter()
            .filter(|e| !e.is_background_template())
            .map(|e| e.z_order)
            .min()
            .unwrap_or(BACKGROUND_Z_ORDER + 1)
    }

    /// Count elements of a given kind
    #[must_use]
    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    /// Remove every element and reset the background color
    pub fn clear(&mut self) {
        self.elements.clear();
        self.background = DEFAULT_BACKGROUND.to_string();
    }

    /// Clear plus zoom reset
    pub fn reset(&mut self) {
        self.clear();
        self.zoom = 1.0;
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    #[test]
    fn test_add_and_get() {
        let mut canvas = Canvas::new();
        let id = canvas
            .add_element(CanvasElement::text("hi", 0.0, 0.0))
            .unwrap();
        assert_eq!(canvas.element_count(), 1);
        assert_eq!(canvas.get(id).unwrap().content_str(), "hi");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut canvas = Canvas::new();
        let el = CanvasElement::text("hi", 0.0, 0.0);
        let copy = el.clone();
        canvas.add_element(el).unwrap();
        let err = canvas.add_element(copy).unwrap_err();
        assert_eq!(err.code(), "duplicate_id");
    }

    #[test]
    fn test_background_template_is_unique() {
        let mut canvas = Canvas::new();
        canvas.set_background_template(CanvasElement::background_template("a.png", "A"));
        canvas.set_background_template(CanvasElement::background_template("b.png", "B"));
        assert_eq!(canvas.element_count(), 1);
        assert_eq!(canvas.background_template().unwrap().content_str(), "b.png");
    }

    #[test]
    fn test_set_background_removes_template() {
        let mut canvas = Canvas::new();
        canvas.set_background_template(CanvasElement::background_template("a.png", "A"));
        canvas.set_background("#fff");
        assert!(canvas.background_template().is_none());
        assert_eq!(canvas.background(), "#fff");
    }

    #[test]
    fn test_z_order_sort_is_stable() {
        let mut canvas = Canvas::new();
        let first = canvas
            .add_element(CanvasElement::text("first", 0.0, 0.0).with_z_order(5))
            .unwrap();
        let second = canvas
            .add_element(CanvasElement::text("second", 0.0, 0.0).with_z_order(5))
            .unwrap();
        let order: Vec<_> = canvas.elements_in_z_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![first, second]);
    }

    #[test]
    fn test_background_template_sorts_first() {
        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::text("t", 0.0, 0.0).with_z_order(-50))
            .unwrap();
        canvas.set_background_template(CanvasElement::background_template("bg.png", "BG"));
        let ordered = canvas.elements_in_z_order();
        assert!(ordered[0].is_background_template());
    }

    #[test]
    fn test_bring_to_front_and_send_to_back() {
        let mut canvas = Canvas::new();
        let a = canvas
            .add_element(CanvasElement::image("a.png", 0.0, 0.0))
            .unwrap();
        let b = canvas
            .add_element(CanvasElement::text("b", 0.0, 0.0))
            .unwrap();
        canvas.bring_to_front(a).unwrap();
        assert!(canvas.get(a).unwrap().z_order > canvas.get(b).unwrap().z_order);
        canvas.send_to_back(a).unwrap();
        assert!(canvas.get(a).unwrap().z_order < canvas.get(b).unwrap().z_order);
        assert!(canvas.get(a).unwrap().z_order > 0);
    }

    #[test]
    fn test_duplicate_offsets_position() {
        let mut canvas = Canvas::new();
        let id = canvas
            .add_element(CanvasElement::shape(ShapeKind::Circle, 100.0, 100.0))
            .unwrap();
        let copy_id = canvas.duplicate(id).unwrap();
        let copy = canvas.get(copy_id).unwrap();
        assert_eq!(copy.geometry.x, 120.0);
        assert_eq!(copy.geometry.y, 120.0);
        assert_ne!(copy_id, id);
    }

    #[test]
    fn test_duplicate_background_rejected() {
        let mut canvas = Canvas::new();
        let id = canvas.set_background_template(CanvasElement::background_template("a.png", "A"));
        assert_eq!(canvas.duplicate(id).unwrap_err().code(), "background_locked");
    }

    #[test]
    fn test_alignment() {
        let mut canvas = Canvas::new();
        let id = canvas
            .add_element(CanvasElement::image("a.png", 300.0, 300.0))
            .unwrap();
        canvas.align(id, Alignment::Left).unwrap();
        assert_eq!(canvas.get(id).unwrap().geometry.x, 10.0);
        canvas.align(id, Alignment::Center).unwrap();
        assert_eq!(canvas.get(id).unwrap().geometry.x, (960.0 - 150.0) / 2.0);
        canvas.align(id, Alignment::Bottom).unwrap();
        assert_eq!(canvas.get(id).unwrap().geometry.y, 540.0 - 150.0 - 10.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut canvas = Canvas::new();
        for _ in 0..40 {
            canvas.zoom_in();
        }
        assert_eq!(canvas.zoom(), MAX_ZOOM);
        for _ in 0..60 {
            canvas.zoom_out();
        }
        assert_eq!(canvas.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_clear_and_reset() {
        let mut canvas = Canvas::new();
        canvas
            .add_element(CanvasElement::text("x", 0.0, 0.0))
            .unwrap();
        canvas.set_zoom(2.0);
        canvas.clear();
        assert!(canvas.is_empty());
        assert_eq!(canvas.background(), DEFAULT_BACKGROUND);
        assert_eq!(canvas.zoom(), 2.0);
        canvas.reset();
        assert_eq!(canvas.zoom(), 1.0);
    }
}
