//! # Actions
//!
//! Everything that can happen in Dossier becomes an `Action`.
//! User presses Enter on a project? That's `Action::SelectProject`.
//! The backend answers a query? That's `Action::QueryAnswered`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller should
//! start. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: apply actions, assert on state and
//! effects. And debuggable: log every action, replay the exact session.
//!
//! Fetch completions (`DocumentsLoaded`, `HistoryLoaded`, `QueryAnswered`,
//! `QueryFailed`) carry the project id they were dispatched for. The reducer
//! drops any completion whose id no longer matches the current selection, so
//! a response that lands after the user switched projects can never write
//! into the wrong project's state.

use std::path::PathBuf;

use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::api::types::flatten_history;
use crate::api::{
    ChatMessage, ChatRequest, ChatResponse, Conversation, Document, DocumentStatus, FileType,
    Project, Role,
};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Projects
    RefreshProjects,
    ProjectsLoaded(Vec<Project>),
    SelectProject(String),
    SubmitNewProject {
        name: String,
        description: Option<String>,
    },
    ProjectCreated(Project),
    DeleteProject(String),

    // Documents
    DocumentsLoaded {
        project_id: String,
        documents: Vec<Document>,
    },
    DocumentsFailed {
        project_id: String,
        message: String,
    },
    UploadFiles(Vec<PathBuf>),
    DocumentUploaded {
        local_id: String,
        document: Document,
    },
    UploadFailed {
        local_id: String,
        message: String,
    },
    DeleteDocument(String),

    // Chat
    SubmitQuery(String),
    QueryAnswered {
        project_id: String,
        response: ChatResponse,
    },
    QueryFailed {
        project_id: String,
        message: String,
    },
    HistoryLoaded {
        project_id: String,
        conversations: Vec<Conversation>,
    },
    HistoryFailed {
        project_id: String,
        message: String,
    },

    // Sources and housekeeping
    InspectSources(usize),
    CloseSources,
    OperationFailed(String),
    ClearError,
    Quit,
}

/// I/O the caller should start after an `update()`. The reducer never
/// performs the I/O itself; the TUI event loop spawns a task per effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    FetchProjects,
    /// Fetch documents and history for this project as two independent tasks.
    FetchProjectData(String),
    CreateProject {
        name: String,
        description: Option<String>,
    },
    DeleteProject(String),
    /// One upload request per file. `files` pairs each provisional record's
    /// local id with the path to send, so completions can be reconciled.
    UploadDocuments {
        project_id: String,
        files: Vec<(String, PathBuf)>,
    },
    DeleteDocument(String),
    SendQuery(ChatRequest),
}

fn local_id() -> String {
    format!("local-{}", Uuid::new_v4())
}

/// Provisional records exist only client-side until the backend confirms
/// them; their ids never refer to anything the backend knows.
fn is_local_id(id: &str) -> bool {
    id.starts_with("local-")
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::RefreshProjects => {
            app.status_message = String::from("Refreshing projects");
            Effect::FetchProjects
        }

        Action::ProjectsLoaded(projects) => {
            info!("Loaded {} projects", projects.len());
            app.projects = projects;
            // Drop a selection that no longer resolves (deleted elsewhere)
            if let Some(id) = app.selected_project.clone()
                && !app.projects.iter().any(|p| p.id == id)
            {
                warn!("Selected project {id} vanished from the list, deselecting");
                clear_selection(app);
            }
            app.status_message = format!("{} projects", app.projects.len());
            Effect::None
        }

        Action::SelectProject(id) => {
            let name = app
                .projects
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.clone());
            info!("Selecting project {id} ({name})");
            clear_selection(app);
            app.selected_project = Some(id.clone());
            app.documents_loading = true;
            app.history_loading = true;
            app.status_message = format!("Loading {name}");
            Effect::FetchProjectData(id)
        }

        Action::SubmitNewProject { name, description } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                app.error = Some(String::from("Project name is required"));
                return Effect::None;
            }
            app.status_message = format!("Creating '{name}'");
            Effect::CreateProject { name, description }
        }

        Action::ProjectCreated(project) => {
            info!("Project created: {} ({})", project.name, project.id);
            app.status_message = format!("Created '{}'", project.name);
            // The backend assigned the id; refresh the list rather than
            // trusting an optimistic insert to match it.
            Effect::FetchProjects
        }

        Action::DeleteProject(id) => {
            // Optimistic: the project and everything hanging off it leaves
            // local state now, independent of the backend call's outcome.
            app.projects.retain(|p| p.id != id);
            app.documents.retain(|d| d.project_id != id);
            app.messages.retain(|m| m.project_id != id);
            if app.selected_project.as_deref() == Some(id.as_str()) {
                clear_selection(app);
                app.status_message = String::from("Project deleted");
            }
            Effect::DeleteProject(id)
        }

        Action::DocumentsLoaded {
            project_id,
            documents,
        } => {
            if app.selected_project.as_deref() != Some(project_id.as_str()) {
                debug!("Discarding documents for {project_id}: selection moved on");
                return Effect::None;
            }
            info!("Loaded {} documents for {project_id}", documents.len());
            app.documents = documents;
            app.documents_loading = false;
            Effect::None
        }

        Action::DocumentsFailed {
            project_id,
            message,
        } => {
            if app.selected_project.as_deref() != Some(project_id.as_str()) {
                return Effect::None;
            }
            app.documents_loading = false;
            app.error = Some(format!("Loading documents failed: {message}"));
            Effect::None
        }

        Action::UploadFiles(paths) => {
            let Some(project_id) = app.selected_project.clone() else {
                app.error = Some(String::from("Select a project before uploading"));
                return Effect::None;
            };

            let mut files = Vec::new();
            let mut skipped = Vec::new();
            for path in paths {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let Some(file_type) = FileType::from_filename(&filename) else {
                    skipped.push(filename);
                    continue;
                };

                // Provisional record: visible immediately as "processing",
                // reconciled when the upload call resolves.
                let id = local_id();
                app.documents.push(Document {
                    id: id.clone(),
                    project_id: project_id.clone(),
                    filename,
                    file_type,
                    uploaded_at: Utc::now(),
                    size: 0,
                    status: DocumentStatus::Processing,
                    page_count: None,
                    error_message: None,
                });
                files.push((id, path));
            }

            if !skipped.is_empty() {
                app.error = Some(format!("Unsupported file type: {}", skipped.join(", ")));
            }
            if files.is_empty() {
                return Effect::None;
            }
            app.status_message = format!("Uploading {} file(s)", files.len());
            Effect::UploadDocuments { project_id, files }
        }

        Action::DocumentUploaded { local_id, document } => {
            info!("Upload confirmed: {} -> {}", local_id, document.id);
            if let Some(slot) = app.documents.iter_mut().find(|d| d.id == local_id) {
                *slot = document.clone();
            } else {
                debug!("Upload {local_id} confirmed after its record was dropped");
            }
            if let Some(project) = app.projects.iter_mut().find(|p| p.id == document.project_id) {
                project.file_count += 1;
            }
            Effect::None
        }

        Action::UploadFailed { local_id, message } => {
            warn!("Upload failed for {local_id}: {message}");
            if let Some(doc) = app.documents.iter_mut().find(|d| d.id == local_id) {
                doc.status = DocumentStatus::Error;
                doc.error_message = Some(message.clone());
            }
            app.error = Some(format!("Upload failed: {message}"));
            Effect::None
        }

        Action::DeleteDocument(id) => {
            let removed = app.documents.iter().position(|d| d.id == id);
            if let Some(ix) = removed {
                let doc = app.documents.remove(ix);
                if let Some(project) = app.projects.iter_mut().find(|p| p.id == doc.project_id) {
                    project.file_count = project.file_count.saturating_sub(1);
                }
            }
            if is_local_id(&id) {
                // Never reached the backend; nothing to delete there.
                return Effect::None;
            }
            Effect::DeleteDocument(id)
        }

        Action::SubmitQuery(text) => {
            let query = text.trim().to_string();
            if query.is_empty() {
                return Effect::None;
            }
            let Some(project_id) = app.selected_project.clone() else {
                app.error = Some(String::from("Select a project before asking"));
                return Effect::None;
            };
            if app.is_sending {
                debug!("Ignoring query while another is in flight");
                return Effect::None;
            }

            // The user message goes into the thread before the request is
            // even sent; a failure later leaves it in place.
            app.messages.push(ChatMessage {
                id: local_id(),
                project_id: project_id.clone(),
                role: Role::User,
                content: query.clone(),
                timestamp: Utc::now(),
                sources: None,
            });
            app.is_sending = true;
            app.error = None;
            app.status_message = String::from("Waiting for answer");

            Effect::SendQuery(ChatRequest {
                project_id,
                query,
                conversation_id: app.conversation_id.clone(),
                include_sources: app.include_sources,
                max_chunks: app.max_chunks,
            })
        }

        Action::QueryAnswered {
            project_id,
            response,
        } => {
            if app.selected_project.as_deref() != Some(project_id.as_str()) {
                debug!("Discarding answer for {project_id}: selection moved on");
                return Effect::None;
            }
            app.is_sending = false;

            if !response.success {
                let reason = response
                    .error
                    .unwrap_or_else(|| String::from("the backend rejected the query"));
                app.error = Some(format!("Query failed: {reason}"));
                return Effect::None;
            }

            let timestamp = response
                .message_metadata
                .as_ref()
                .and_then(|m| m.timestamp)
                .unwrap_or_else(Utc::now);
            app.conversation_id = Some(response.conversation_id.clone());
            app.messages.push(ChatMessage {
                id: local_id(),
                project_id,
                role: Role::Assistant,
                content: response.response,
                timestamp,
                // Carried verbatim; the source panel shows exactly what the
                // backend retrieved.
                sources: response.sources,
            });
            app.status_message = String::new();
            Effect::None
        }

        Action::QueryFailed {
            project_id,
            message,
        } => {
            if app.selected_project.as_deref() != Some(project_id.as_str()) {
                return Effect::None;
            }
            app.is_sending = false;
            app.error = Some(format!("Query failed: {message}"));
            Effect::None
        }

        Action::HistoryLoaded {
            project_id,
            conversations,
        } => {
            if app.selected_project.as_deref() != Some(project_id.as_str()) {
                debug!("Discarding history for {project_id}: selection moved on");
                return Effect::None;
            }
            info!(
                "Loaded {} conversations for {project_id}",
                conversations.len()
            );
            // Follow-up queries continue the most recent conversation.
            app.conversation_id = conversations.last().map(|c| c.conversation_id.clone());
            app.messages = flatten_history(&conversations);
            app.history_loading = false;
            Effect::None
        }

        Action::HistoryFailed {
            project_id,
            message,
        } => {
            if app.selected_project.as_deref() != Some(project_id.as_str()) {
                return Effect::None;
            }
            app.history_loading = false;
            app.error = Some(format!("Loading history failed: {message}"));
            Effect::None
        }

        Action::InspectSources(ix) => {
            let has_sources = app
                .messages
                .get(ix)
                .and_then(|m| m.sources.as_ref())
                .is_some_and(|s| !s.is_empty());
            if has_sources {
                app.inspected_sources = Some(ix);
            } else {
                app.status_message = String::from("No sources for that message");
            }
            Effect::None
        }

        Action::CloseSources => {
            app.inspected_sources = None;
            Effect::None
        }

        Action::OperationFailed(message) => {
            warn!("Operation failed: {message}");
            app.error = Some(message);
            Effect::None
        }

        Action::ClearError => {
            app.error = None;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Resets everything that belongs to the selected project.
fn clear_selection(app: &mut App) {
    app.selected_project = None;
    app.documents.clear();
    app.messages.clear();
    app.conversation_id = None;
    app.is_sending = false;
    app.documents_loading = false;
    app.history_loading = false;
    app.inspected_sources = None;
}
