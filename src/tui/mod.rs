//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into `core::Action` values. This is the only
//! module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (fetch or query in flight): draws every ~80ms so the
//!   spinner moves.
//! - **Idle**: sleeps up to 250ms and only redraws on events or actions.
//!
//! ## Effects
//!
//! `update()` never performs I/O; it returns an `Effect`, and
//! [`execute_effect`] spawns one tokio task per request. Tasks post their
//! outcome back over an mpsc channel as new actions. Documents, history
//! and chat tasks tag their completion with the project id they were
//! spawned for; the reducer discards completions for a project that is no
//! longer selected.

mod component;
pub mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::api::BackendClient;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, Prompt, PromptEvent, PromptKind};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane keyboard input is directed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Projects,
    Documents,
    Chat,
}

impl Focus {
    fn next(self) -> Focus {
        match self {
            Focus::Projects => Focus::Documents,
            Focus::Documents => Focus::Chat,
            Focus::Chat => Focus::Projects,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic).
pub struct TuiState {
    pub focus: Focus,
    pub project_selected: usize,
    pub document_selected: usize,
    pub message_list: MessageListState,
    pub input: InputBox,
    /// Modal text prompt (None = hidden).
    pub prompt: Option<Prompt>,
    /// Scroll offset inside the source panel overlay.
    pub source_scroll: u16,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Projects,
            project_selected: 0,
            document_selected: 0,
            message_list: MessageListState::new(),
            input: InputBox::new(),
            prompt: None,
            source_scroll: 0,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: continuous redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Applies an action and starts whatever I/O it calls for.
fn dispatch(
    app: &mut App,
    action: Action,
    tx: &mpsc::Sender<Action>,
    should_quit: &mut bool,
) {
    debug!("Dispatching: {:?}", action);
    let client = app.client.clone();
    let effect = update(app, action);
    if effect == Effect::Quit {
        *should_quit = true;
    } else {
        execute_effect(effect, &client, tx);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = Arc::new(BackendClient::new(config.base_url.clone()));
    let mut app = App::from_config(client.clone(), &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Projects load on startup, before any interaction
    app.status_message = String::from("Loading projects");
    execute_effect(Effect::FetchProjects, &client, &tx);

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    loop {
        // Keep list selections inside their lists as state changes under them
        tui.project_selected = tui
            .project_selected
            .min(app.projects.len().saturating_sub(1));
        tui.document_selected = tui
            .document_selected
            .min(app.documents.len().saturating_sub(1));

        let animating = app.is_sending || app.is_project_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 10.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short while animating, long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);

        if first_event.is_some() {
            needs_redraw = true;
        }
        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // Ctrl+C always quits regardless of focus or overlays
            if matches!(event, TuiEvent::ForceQuit) {
                dispatch(&mut app, Action::Quit, &tx, &mut should_quit);
                continue;
            }

            // Modal prompt swallows everything while open
            if let Some(prompt) = tui.prompt.as_mut() {
                if let Some(prompt_event) = prompt.handle_event(&event) {
                    tui.prompt = None;
                    match prompt_event {
                        PromptEvent::Submit(PromptKind::NewProject, text) => {
                            let (name, description) = parse_new_project(&text);
                            dispatch(
                                &mut app,
                                Action::SubmitNewProject { name, description },
                                &tx,
                                &mut should_quit,
                            );
                        }
                        PromptEvent::Submit(PromptKind::UploadFiles, text) => {
                            let paths = parse_upload_paths(&text);
                            if !paths.is_empty() {
                                dispatch(&mut app, Action::UploadFiles(paths), &tx, &mut should_quit);
                            }
                        }
                        PromptEvent::Cancel => {}
                    }
                }
                continue;
            }

            // Source panel overlay
            if app.inspected_sources.is_some() {
                match event {
                    TuiEvent::Escape | TuiEvent::InputChar('q') | TuiEvent::OpenSources => {
                        tui.source_scroll = 0;
                        dispatch(&mut app, Action::CloseSources, &tx, &mut should_quit);
                    }
                    TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                        tui.source_scroll = tui.source_scroll.saturating_sub(1);
                    }
                    TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                        tui.source_scroll = tui.source_scroll.saturating_add(1);
                    }
                    _ => {}
                }
                continue;
            }

            if matches!(event, TuiEvent::OpenSources) {
                match app.last_sourced_message() {
                    Some(ix) => {
                        tui.source_scroll = 0;
                        dispatch(&mut app, Action::InspectSources(ix), &tx, &mut should_quit);
                    }
                    None => app.status_message = String::from("No sourced answer yet"),
                }
                continue;
            }

            if matches!(event, TuiEvent::CycleFocus) {
                tui.focus = tui.focus.next();
                continue;
            }

            match tui.focus {
                Focus::Projects => match event {
                    TuiEvent::CursorUp => {
                        tui.project_selected = tui.project_selected.saturating_sub(1);
                    }
                    TuiEvent::CursorDown => {
                        if tui.project_selected + 1 < app.projects.len() {
                            tui.project_selected += 1;
                        }
                    }
                    TuiEvent::Submit => {
                        if let Some(project) = app.projects.get(tui.project_selected) {
                            let id = project.id.clone();
                            tui.message_list = MessageListState::new();
                            tui.document_selected = 0;
                            tui.source_scroll = 0;
                            tui.focus = Focus::Chat;
                            dispatch(&mut app, Action::SelectProject(id), &tx, &mut should_quit);
                        }
                    }
                    TuiEvent::InputChar('n') => {
                        tui.prompt = Some(Prompt::new(PromptKind::NewProject));
                    }
                    TuiEvent::InputChar('r') => {
                        dispatch(&mut app, Action::RefreshProjects, &tx, &mut should_quit);
                    }
                    TuiEvent::InputChar('d') | TuiEvent::Delete => {
                        if let Some(project) = app.projects.get(tui.project_selected) {
                            let id = project.id.clone();
                            dispatch(&mut app, Action::DeleteProject(id), &tx, &mut should_quit);
                        }
                    }
                    TuiEvent::InputChar('q') => {
                        dispatch(&mut app, Action::Quit, &tx, &mut should_quit);
                    }
                    TuiEvent::Escape => {
                        dispatch(&mut app, Action::ClearError, &tx, &mut should_quit);
                    }
                    _ => {}
                },
                Focus::Documents => match event {
                    TuiEvent::CursorUp => {
                        tui.document_selected = tui.document_selected.saturating_sub(1);
                    }
                    TuiEvent::CursorDown => {
                        if tui.document_selected + 1 < app.documents.len() {
                            tui.document_selected += 1;
                        }
                    }
                    TuiEvent::InputChar('u') => {
                        if app.selected_project.is_some() {
                            tui.prompt = Some(Prompt::new(PromptKind::UploadFiles));
                        } else {
                            app.status_message = String::from("Select a project first");
                        }
                    }
                    TuiEvent::InputChar('d') | TuiEvent::Delete => {
                        if let Some(doc) = app.documents.get(tui.document_selected) {
                            let id = doc.id.clone();
                            dispatch(&mut app, Action::DeleteDocument(id), &tx, &mut should_quit);
                        }
                    }
                    TuiEvent::InputChar('q') => {
                        dispatch(&mut app, Action::Quit, &tx, &mut should_quit);
                    }
                    TuiEvent::Escape => {
                        dispatch(&mut app, Action::ClearError, &tx, &mut should_quit);
                    }
                    _ => {}
                },
                Focus::Chat => match event {
                    TuiEvent::Escape => {
                        if app.error.is_some() {
                            dispatch(&mut app, Action::ClearError, &tx, &mut should_quit);
                        } else {
                            tui.focus = Focus::Projects;
                        }
                    }
                    scroll @ (TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown) => {
                        tui.message_list.handle_event(&scroll);
                    }
                    TuiEvent::CursorUp => {
                        tui.message_list.handle_event(&TuiEvent::ScrollUp);
                    }
                    TuiEvent::CursorDown => {
                        tui.message_list.handle_event(&TuiEvent::ScrollDown);
                    }
                    other => {
                        if let Some(InputEvent::Submit(text)) = tui.input.handle_event(&other) {
                            dispatch(&mut app, Action::SubmitQuery(text), &tx, &mut should_quit);
                        }
                    }
                },
            }
        }

        // Actions posted by background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(&mut app, action, &tx, &mut should_quit);
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Sends an action to the event loop, logging if the loop is gone.
fn post(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to post action: receiver dropped");
    }
}

/// Starts the I/O a reducer effect asked for. One tokio task per request;
/// every task resolves to exactly one action posted back to the loop.
fn execute_effect(effect: Effect, client: &Arc<BackendClient>, tx: &mpsc::Sender<Action>) {
    match effect {
        Effect::None | Effect::Quit => {}

        Effect::FetchProjects => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                match client.list_projects().await {
                    Ok(projects) => post(&tx, Action::ProjectsLoaded(projects)),
                    Err(e) => post(
                        &tx,
                        Action::OperationFailed(format!("Loading projects failed: {e}")),
                    ),
                }
            });
        }

        Effect::FetchProjectData(project_id) => {
            // Two independent tasks; they may complete in either order and
            // each updates its own state slice.
            spawn_fetch_documents(project_id.clone(), client, tx);
            spawn_fetch_history(project_id, client, tx);
        }

        Effect::CreateProject { name, description } => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                match client.create_project(&name, description.as_deref()).await {
                    Ok(project) => post(&tx, Action::ProjectCreated(project)),
                    Err(e) => post(
                        &tx,
                        Action::OperationFailed(format!("Creating '{name}' failed: {e}")),
                    ),
                }
            });
        }

        Effect::DeleteProject(project_id) => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                // Local state already dropped the project; this only tells
                // the backend. A failure is surfaced but nothing is rolled
                // back.
                match client.delete_project(&project_id).await {
                    Ok(status) => info!("Delete project {project_id}: {}", status.message),
                    Err(e) => post(
                        &tx,
                        Action::OperationFailed(format!("Deleting project failed: {e}")),
                    ),
                }
            });
        }

        Effect::UploadDocuments { project_id, files } => {
            // One request per file, no batching: dropping three files on a
            // project produces three uploads.
            for (local_id, path) in files {
                spawn_upload(project_id.clone(), local_id, path, client, tx);
            }
        }

        Effect::DeleteDocument(document_id) => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                match client.delete_document(&document_id).await {
                    Ok(status) => info!("Delete document {document_id}: {}", status.message),
                    Err(e) => post(
                        &tx,
                        Action::OperationFailed(format!("Deleting document failed: {e}")),
                    ),
                }
            });
        }

        Effect::SendQuery(request) => {
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let project_id = request.project_id.clone();
                match client.send_query(&request).await {
                    Ok(response) => post(
                        &tx,
                        Action::QueryAnswered {
                            project_id,
                            response,
                        },
                    ),
                    Err(e) => post(
                        &tx,
                        Action::QueryFailed {
                            project_id,
                            message: e.to_string(),
                        },
                    ),
                }
            });
        }
    }
}

fn spawn_fetch_documents(project_id: String, client: &Arc<BackendClient>, tx: &mpsc::Sender<Action>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.list_documents(&project_id).await {
            Ok(documents) => post(
                &tx,
                Action::DocumentsLoaded {
                    project_id,
                    documents,
                },
            ),
            Err(e) => post(
                &tx,
                Action::DocumentsFailed {
                    project_id,
                    message: e.to_string(),
                },
            ),
        }
    });
}

fn spawn_fetch_history(project_id: String, client: &Arc<BackendClient>, tx: &mpsc::Sender<Action>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.fetch_history(&project_id).await {
            Ok(conversations) => post(
                &tx,
                Action::HistoryLoaded {
                    project_id,
                    conversations,
                },
            ),
            Err(e) => post(
                &tx,
                Action::HistoryFailed {
                    project_id,
                    message: e.to_string(),
                },
            ),
        }
    });
}

fn spawn_upload(
    project_id: String,
    local_id: String,
    path: PathBuf,
    client: &Arc<BackendClient>,
    tx: &mpsc::Sender<Action>,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.upload_document(&project_id, &path).await {
            Ok(document) => post(&tx, Action::DocumentUploaded { local_id, document }),
            Err(e) => post(
                &tx,
                Action::UploadFailed {
                    local_id,
                    message: e.to_string(),
                },
            ),
        }
    });
}

/// Splits prompt input into a project name and optional description:
/// everything after the first `|` is the description.
fn parse_new_project(input: &str) -> (String, Option<String>) {
    match input.split_once('|') {
        Some((name, description)) => {
            let description = description.trim();
            (
                name.trim().to_string(),
                (!description.is_empty()).then(|| description.to_string()),
            )
        }
        None => (input.trim().to_string(), None),
    }
}

/// Splits prompt input into upload paths, one per whitespace-separated token.
fn parse_upload_paths(input: &str) -> Vec<PathBuf> {
    input.split_whitespace().map(PathBuf::from).collect()
}
