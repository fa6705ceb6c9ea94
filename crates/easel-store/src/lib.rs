//! Easel Store - Persistent Editor State
//!
//! This crate provides the persistence layer for Easel:
//! - Kv: String-keyed JSON store (SQLite or in-memory) with a byte quota
//! - Keys: The fixed key names editor state lives under
//! - Project: Project save/load with size gate, list and recovery history
//! - Library: Capped media, audio, prompt, template and tab libraries
//! - Autosave: Periodic background save of the active session
//! - Notify: Fire-and-forget sink for user-visible save outcomes
//! - Error: Error types for storage operations
//!
//! ## Features
//!
//! - Oversized projects rejected before any write
//! - Quota exhaustion handled by evicting recoverable data and retrying once
//! - Oldest-first eviction for capped asset libraries, LRU for prompts
//! - Autosave that only writes when the session actually changed
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use easel_store::{ProjectStore, SqliteStore};
//!
//! let store = Arc::new(SqliteStore::connect("sqlite:easel.db").await?);
//! let projects = ProjectStore::new(store);
//! projects.save_project(&snapshot).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod autosave;
pub mod error;
pub mod keys;
pub mod kv;
pub mod library;
pub mod notify;
pub mod project;

// Re-export main types
pub use autosave::AutosaveHandle;
pub use error::{Error, Result};
pub use kv::{MemoryStore, SqliteStore, StateStore, DEFAULT_QUOTA_BYTES};
pub use library::{
    AudioFile, LibraryStore, MediaFile, MediaKind, PromptEntry, TabPreference, TabVisit,
    TemplateEntry,
};
pub use notify::{LogSink, NoticeLevel, NotificationSink};
pub use project::{ProjectStore, ProjectSummary, MAX_PROJECT_BYTES};
