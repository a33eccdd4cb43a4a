//! # Application State
//!
//! Core business state for Dossier. This module contains domain state only,
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── client: Arc<BackendClient>     // HTTP access functions
//! ├── projects: Vec<Project>         // all projects
//! ├── selected_project: Option<id>   // current selection
//! ├── documents: Vec<Document>       // selected project's documents
//! ├── messages: Vec<ChatMessage>     // selected project's chat thread
//! ├── conversation_id: Option<id>    // threads follow-up queries
//! ├── is_sending: bool               // chat query in flight
//! ├── documents_loading: bool        // documents fetch in flight
//! ├── history_loading: bool          // history fetch in flight
//! ├── inspected_sources: Option<ix>  // message whose sources are shown
//! ├── status_message: String         // status bar text
//! └── error: Option<String>          // error line text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::api::{BackendClient, ChatMessage, Document, Project, Role};
use crate::core::config::ResolvedConfig;

pub struct App {
    pub client: Arc<BackendClient>,
    pub projects: Vec<Project>,
    /// Id of the selected project. None = landing state, nothing selected.
    pub selected_project: Option<String>,
    pub documents: Vec<Document>,
    pub messages: Vec<ChatMessage>,
    /// Conversation id from the last answer, echoed on follow-up queries so
    /// the backend keeps them in one conversation.
    pub conversation_id: Option<String>,
    pub is_sending: bool,
    pub documents_loading: bool,
    pub history_loading: bool,
    /// Index into `messages` of the message whose sources are on display.
    pub inspected_sources: Option<usize>,
    pub status_message: String,
    pub error: Option<String>,
    pub include_sources: bool,
    pub max_chunks: u32,
}

impl App {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self {
            client,
            projects: Vec::new(),
            selected_project: None,
            documents: Vec::new(),
            messages: Vec::new(),
            conversation_id: None,
            is_sending: false,
            documents_loading: false,
            history_loading: false,
            inspected_sources: None,
            status_message: String::from("Select a project, or press n to create one"),
            error: None,
            include_sources: true,
            max_chunks: 5,
        }
    }

    pub fn from_config(client: Arc<BackendClient>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(client);
        app.include_sources = config.include_sources;
        app.max_chunks = config.max_chunks;
        app
    }

    /// The currently selected project record, if the id still resolves.
    pub fn selected_project(&self) -> Option<&Project> {
        let id = self.selected_project.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    /// Index of the most recent assistant message that carries sources.
    /// This is what the source panel opens on when no message was picked.
    pub fn last_sourced_message(&self) -> Option<usize> {
        self.messages
            .iter()
            .rposition(|m| m.role == Role::Assistant && m.sources.as_ref().is_some_and(|s| !s.is_empty()))
    }

    /// True while any fetch for the selected project is still in flight.
    pub fn is_project_loading(&self) -> bool {
        self.documents_loading || self.history_loading
    }
}
