//! Editor Event Types
//!
//! This module defines event types emitted by editing operations. Events are
//! recorded in memory for activity logging and to drive UI notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Editor event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorEventType {
    /// Element added to the canvas
    ElementAdded,
    /// Element content or style updated
    ElementUpdated,
    /// Element deleted
    ElementDeleted,
    /// Element moved or resized
    ElementMoved,
    /// Background color or template changed
    BackgroundChanged,
    /// Zoom level changed
    ZoomChanged,
    /// Canvas cleared
    CanvasCleared,
    /// Project saved
    ProjectSaved,
    /// Project loaded
    ProjectLoaded,
    /// AI text request started
    AiRequestStarted,
    /// AI text request completed
    AiCompleted,
    /// AI text request cancelled
    AiCancelled,
    /// AI text request failed
    AiError,
}

impl EditorEventType {
    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ElementAdded => "element_added",
            Self::ElementUpdated => "element_updated",
            Self::ElementDeleted => "element_deleted",
            Self::ElementMoved => "element_moved",
            Self::BackgroundChanged => "background_changed",
            Self::ZoomChanged => "zoom_changed",
            Self::CanvasCleared => "canvas_cleared",
            Self::ProjectSaved => "project_saved",
            Self::ProjectLoaded => "project_loaded",
            Self::AiRequestStarted => "ai_request_started",
            Self::AiCompleted => "ai_completed",
            Self::AiCancelled => "ai_cancelled",
            Self::AiError => "ai_error",
        }
    }

    /// Check if this is an AI-related event
    #[must_use]
    pub fn is_ai_event(&self) -> bool {
        matches!(
            self,
            Self::AiRequestStarted | Self::AiCompleted | Self::AiCancelled | Self::AiError
        )
    }

    /// Check if this is an element-related event
    #[must_use]
    pub fn is_element_event(&self) -> bool {
        matches!(
            self,
            Self::ElementAdded | Self::ElementUpdated | Self::ElementDeleted | Self::ElementMoved
        )
    }
}

impl std::fmt::Display for EditorEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An editor event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorEvent {
    /// Unique event identifier
    pub id: Uuid,

    /// Session this event belongs to
    pub session_id: Uuid,

    /// Sequence number within the session
    pub sequence_num: i64,

    /// Event type
    pub event_type: EditorEventType,

    /// Element the event refers to, if any
    pub element_id: Option<Uuid>,

    /// Event-specific payload
    #[serde(default)]
    pub payload: serde_json::Value,

    /// When the event occurred
    pub timestamp: DateTime<Utc>,
}

impl EditorEvent {
    /// Create a new event
    #[must_use]
    pub fn new(session_id: Uuid, sequence_num: i64, event_type: EditorEventType) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            sequence_num,
            event_type,
            element_id: None,
            payload: serde_json::json!({}),
            timestamp: Utc::now(),
        }
    }

    /// Set the element id
    #[must_use]
    pub fn with_element(mut self, element_id: Uuid) -> Self {
        self.element_id = Some(element_id);
        self
    }

    /// Set the payload
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// In-memory event log for one session
#[derive(Debug)]
pub struct EventRecorder {
    session_id: Uuid,
    events: Vec<EditorEvent>,
    next_sequence: i64,
}

impl EventRecorder {
    /// Create a recorder for a session
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            events: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Record an event and return a reference to it
    pub fn record(&mut self, event_type: EditorEventType) -> &EditorEvent {
        self.record_event(EditorEvent::new(self.session_id, 0, event_type))
    }

    /// Record a pre-built event, assigning its sequence number
    pub fn record_event(&mut self, mut event: EditorEvent) -> &EditorEvent {
        event.session_id = self.session_id;
        event.sequence_num = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    /// All recorded events in order
    #[must_use]
    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    /// Events of a single type, in order
    #[must_use]
    pub fn events_of_type(&self, event_type: EditorEventType) -> Vec<&EditorEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Number of recorded events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all recorded events, keeping the sequence counter
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_as_str() {
        assert_eq!(EditorEventType::ElementAdded.as_str(), "element_added");
        assert_eq!(EditorEventType::AiCancelled.as_str(), "ai_cancelled");
        assert_eq!(EditorEventType::ZoomChanged.to_string(), "zoom_changed");
    }

    #[test]
    fn test_event_type_categories() {
        assert!(EditorEventType::AiError.is_ai_event());
        assert!(!EditorEventType::AiError.is_element_event());
        assert!(EditorEventType::ElementMoved.is_element_event());
        assert!(!EditorEventType::ProjectSaved.is_element_event());
    }

    #[test]
    fn test_recorder_assigns_sequence() {
        let mut recorder = EventRecorder::new(Uuid::new_v4());
        recorder.record(EditorEventType::ElementAdded);
        recorder.record(EditorEventType::ElementMoved);
        let third = recorder.record(EditorEventType::ProjectSaved);
        assert_eq!(third.sequence_num, 3);
        assert_eq!(recorder.len(), 3);
    }

    #[test]
    fn test_recorder_filters_by_type() {
        let mut recorder = EventRecorder::new(Uuid::new_v4());
        let element_id = Uuid::new_v4();
        recorder.record_event(
            EditorEvent::new(Uuid::nil(), 0, EditorEventType::ElementAdded)
                .with_element(element_id),
        );
        recorder.record(EditorEventType::ProjectSaved);

        let added = recorder.events_of_type(EditorEventType::ElementAdded);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].element_id, Some(element_id));
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut recorder = EventRecorder::new(Uuid::new_v4());
        recorder.record(EditorEventType::ElementAdded);
        recorder.clear();
        assert!(recorder.is_empty());
        let next = recorder.record(EditorEventType::ElementDeleted);
        assert_eq!(next.sequence_num, 2);
    }

    #[test]
    fn test_event_serializes_snake_case() {
        let event = EditorEvent::new(Uuid::nil(), 1, EditorEventType::BackgroundChanged);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "background_changed");
    }
}
