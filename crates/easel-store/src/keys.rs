//! Storage Keys
//!
//! Fixed string keys under which editor state is persisted. Names are part
//! of the stored data contract and must stay stable across releases.

/// Full snapshot of the project being edited
pub const CURRENT_PROJECT: &str = "current_project_data";

/// Lightweight canvas autosave state
pub const CANVAS_STATE: &str = "canvas_state";

/// Summaries of saved projects, most recent first
pub const SAVED_PROJECTS: &str = "saved_projects_list";

/// Recent full project snapshots for recovery
pub const PROJECT_HISTORY: &str = "project_history";

/// Uploaded image and video files
pub const UPLOADED_FILES: &str = "uploaded_files";

/// Uploaded audio files
pub const UPLOADED_AUDIO: &str = "uploaded_audio_files";

/// Audio effects library
pub const AUDIO_EFFECTS: &str = "audio_effects_library";

/// AI prompt history
pub const PROMPT_HISTORY: &str = "ai_prompts_history";

/// User-saved templates
pub const USER_TEMPLATES: &str = "user_templates";

/// Per-tab usage counters
pub const TAB_PREFERENCES: &str = "user_tab_preferences";

/// Recent tab activations
pub const TAB_HISTORY: &str = "tab_usage_history";

/// Every key the store manages
pub const ALL_KEYS: &[&str] = &[
    CURRENT_PROJECT,
    CANVAS_STATE,
    SAVED_PROJECTS,
    PROJECT_HISTORY,
    UPLOADED_FILES,
    UPLOADED_AUDIO,
    AUDIO_EFFECTS,
    PROMPT_HISTORY,
    USER_TEMPLATES,
    TAB_PREFERENCES,
    TAB_HISTORY,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for key in ALL_KEYS {
            assert!(seen.insert(*key), "duplicate key: {key}");
        }
        assert_eq!(ALL_KEYS.len(), 11);
    }
}
