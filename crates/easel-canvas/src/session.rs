//! Editor Session State
//!
//! This module owns the mutable editing context: the canvas, the current
//! selection and tool, the clipboard, and the change fingerprint used by
//! autosave. What the original editor kept as ambient globals lives here as
//! one explicit state struct.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::canvas::Canvas;
use crate::element::CanvasElement;
use crate::error::{Error, Result};
use crate::snapshot::ProjectSnapshot;

/// Offset applied when pasting a copied element, in pixels
const PASTE_OFFSET: f64 = 20.0;
/// Fallback project name
const UNTITLED: &str = "Untitled Project";

/// The active source panel / tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tool {
    /// Plain selection (default)
    #[default]
    Select,
    /// Media panel (images, video)
    Media,
    /// Text panel
    Text,
    /// Audio panel
    Audio,
    /// Template panel
    Template,
}

/// An active editing context for one project
#[derive(Debug)]
pub struct EditorSession {
    /// Session identifier
    pub id: Uuid,

    /// Project identifier, kept stable across saves
    project_id: Uuid,

    /// Project display name
    project_name: String,

    /// The canvas being edited
    canvas: Canvas,

    /// Currently selected element, if any
    selection: Option<Uuid>,

    /// Active tool / source panel
    tool: Tool,

    /// Copied element awaiting paste
    clipboard: Option<CanvasElement>,

    /// Copied element whose presentation can be pasted onto another element
    copied_style: Option<CanvasElement>,

    /// Serialized element state at the last save, for change detection
    saved_fingerprint: Option<String>,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl EditorSession {
    /// Create a session around an empty canvas
    #[must_use]
    pub fn new() -> Self {
        Self::with_canvas(Canvas::new())
    }

    /// Create a session around an existing canvas
    #[must_use]
    pub fn with_canvas(canvas: Canvas) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            project_name: UNTITLED.to_string(),
            canvas,
            selection: None,
            tool: Tool::default(),
            clipboard: None,
            copied_style: None,
            saved_fingerprint: None,
            created_at: Utc::now(),
        }
    }

    /// Create a session from a restored snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: &ProjectSnapshot) -> Self {
        let mut session = Self::with_canvas(snapshot.restore());
        session.project_id = snapshot.id;
        session.project_name = snapshot.name.clone();
        // A freshly restored project has nothing to autosave yet.
        session.saved_fingerprint = session.fingerprint();
        session
    }

    /// Project display name
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Rename the project
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.project_name = if name.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            name
        };
    }

    /// Read access to the canvas
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Mutable access to the canvas
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Current tool
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tool
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Currently selected element id, if any
    #[must_use]
    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    /// Currently selected element, if any
    #[must_use]
    pub fn selected_element(&self) -> Option<&CanvasElement> {
        self.selection.and_then(|id| self.canvas.get(id))
    }

    /// Select an element. The background template is not selectable.
    pub fn select(&mut self, id: Uuid) -> Result<()> {
        let element = self.canvas.get(id).ok_or(Error::ElementNotFound(id))?;
        if element.is_background_template() {
            return Err(Error::BackgroundLocked);
        }
        self.selection = Some(id);
        Ok(())
    }

    /// Clear the selection
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Add an element and select it (the add/drop/paste entry point)
    pub fn add_and_select(&mut self, element: CanvasElement) -> Result<Uuid> {
        let background = element.is_background_template();
        let id = self.canvas.add_element(element)?;
        if !background {
            self.selection = Some(id);
        }
        Ok(id)
    }

    /// Delete the selected element, clearing the selection
    pub fn delete_selected(&mut self) -> Option<CanvasElement> {
        let id = self.selection.take()?;
        self.canvas.remove(id)
    }

    /// Copy the selected element to the clipboard
    pub fn copy_selected(&mut self) -> Result<()> {
        let element = self
            .selected_element()
            .ok_or(Error::ElementNotFound(Uuid::nil()))?;
        self.clipboard = Some(element.clone());
        Ok(())
    }

    /// Paste the clipboard as a new element, offset and selected.
    ///
    /// Returns `None` when the clipboard is empty.
    pub fn paste(&mut self) -> Option<Uuid> {
        let mut copy = self.clipboard.clone()?.with_id(Uuid::new_v4());
        copy.translate(PASTE_OFFSET, PASTE_OFFSET);
        match self.canvas.add_element(copy) {
            Ok(id) => {
                self.selection = Some(id);
                Some(id)
            }
            Err(_) => None,
        }
    }

    /// Duplicate the selected element in place (copy + paste in one step)
    pub fn duplicate_selected(&mut self) -> Result<Uuid> {
        let id = self
            .selection
            .ok_or(Error::ElementNotFound(Uuid::nil()))?;
        let copy_id = self.canvas.duplicate(id)?;
        self.selection = Some(copy_id);
        Ok(copy_id)
    }

    /// Remember the selected element's presentation for style paste
    pub fn copy_style(&mut self) -> Result<()> {
        let element = self
            .selected_element()
            .ok_or(Error::ElementNotFound(Uuid::nil()))?;
        self.copied_style = Some(element.clone());
        Ok(())
    }

    /// Apply the remembered presentation to the selected element.
    ///
    /// Position and id are preserved; size, rotation, opacity and the
    /// kind-specific style come from the copied source. Styles only cross
    /// between elements of the same kind.
    pub fn paste_style(&mut self) -> Result<()> {
        let source = self
            .copied_style
            .clone()
            .ok_or_else(|| Error::invalid_snapshot("no copied style"))?;
        let id = self
            .selection
            .ok_or(Error::ElementNotFound(Uuid::nil()))?;
        let target = self.canvas.get_mut(id).ok_or(Error::ElementNotFound(id))?;

        target.geometry.width = source.geometry.width;
        target.geometry.height = source.geometry.height;
        target.geometry.rotation_deg = source.geometry.rotation_deg;
        target.geometry.opacity = source.geometry.opacity;

        match (&mut target.content, &source.content) {
            (
                crate::element::ElementContent::Text { style, .. },
                crate::element::ElementContent::Text { style: from, .. },
            ) => *style = from.clone(),
            (
                crate::element::ElementContent::Image { style, .. },
                crate::element::ElementContent::Image { style: from, .. },
            ) => *style = from.clone(),
            _ => {}
        }
        Ok(())
    }

    /// Capture the session into a project snapshot
    #[must_use]
    pub fn capture(&self) -> ProjectSnapshot {
        ProjectSnapshot::capture(&self.canvas, self.project_name.clone())
            .with_id(self.project_id)
    }

    /// Whether the canvas changed since the last recorded save.
    ///
    /// A fingerprint failure counts as changed, so a save is attempted
    /// rather than silently skipped.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        match (&self.saved_fingerprint, self.fingerprint()) {
            (Some(saved), Some(current)) => *saved != current,
            _ => true,
        }
    }

    /// Record that the current state was saved
    pub fn mark_saved(&mut self) {
        self.saved_fingerprint = self.fingerprint();
    }

    /// Record that a previously captured state was saved.
    ///
    /// Takes the fingerprint from capture time, so an edit that lands while
    /// the write is in flight still reads as unsaved afterwards.
    pub fn mark_saved_as(&mut self, fingerprint: Option<String>) {
        self.saved_fingerprint = fingerprint;
    }

    /// Fingerprint of the current canvas state.
    ///
    /// `None` when the state cannot be serialized; comparisons treat that
    /// as changed.
    #[must_use]
    pub fn fingerprint(&self) -> Option<String> {
        let ordered: Vec<&CanvasElement> = self.canvas.elements_in_z_order();
        serde_json::to_string(&(
            ordered,
            self.canvas.background(),
            self.canvas.zoom(),
        ))
        .ok()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
