//! Frame layout: title bar on top, sidebar (projects over documents) on the
//! left, chat thread and query input on the right, overlays above it all.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    DocumentPanel, MessageList, ProjectPanel, SourcePanel, TitleBar,
};
use crate::tui::{Focus, TuiState};

const SIDEBAR_WIDTH: u16 = 32;

/// Computed pane rectangles for one frame.
pub struct Panes {
    pub title: Rect,
    pub projects: Rect,
    pub documents: Rect,
    pub chat: Rect,
    pub input: Rect,
}

/// Splits the frame area into panes. Kept separate from drawing so both
/// rendering and tests agree on the geometry.
pub fn layout(area: Rect) -> Panes {
    use Constraint::{Length, Min, Percentage};

    let [title, body] = Layout::vertical([Length(1), Min(0)]).areas(area);
    let [sidebar, main] = Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(body);
    let [projects, documents] = Layout::vertical([Percentage(50), Percentage(50)]).areas(sidebar);
    let [chat, input] = Layout::vertical([Min(0), Length(3)]).areas(main);

    Panes {
        title,
        projects,
        documents,
        chat,
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let full = frame.area();
    let panes = layout(full);

    let selected_name = app.selected_project().map(|p| p.name.clone());
    TitleBar {
        backend: app.client.base_url(),
        project_name: selected_name.as_deref(),
        status: &app.status_message,
        error: app.error.as_deref(),
    }
    .render(frame, panes.title);

    ProjectPanel {
        projects: &app.projects,
        selected: tui.project_selected,
        active_id: app.selected_project.as_deref(),
        focused: tui.focus == Focus::Projects,
    }
    .render(frame, panes.projects);

    DocumentPanel {
        documents: &app.documents,
        selected: tui.document_selected,
        focused: tui.focus == Focus::Documents,
        loading: app.documents_loading,
        has_project: app.selected_project.is_some(),
    }
    .render(frame, panes.documents);

    if app.selected_project.is_none() {
        draw_landing(frame, panes.chat);
    } else if app.history_loading {
        let loading = Paragraph::new("loading chat history…")
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(loading, panes.chat);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.messages,
            app.is_sending,
            spinner_frame,
        )
        .render(frame, panes.chat);
    }

    tui.input.focused = tui.focus == Focus::Chat;
    tui.input.render(frame, panes.input);

    // Overlays, last so they sit on top
    if let Some(ix) = app.inspected_sources
        && let Some(message) = app.messages.get(ix)
    {
        SourcePanel {
            message,
            scroll: tui.source_scroll,
        }
        .render(frame, full);
    }
    if let Some(prompt) = tui.prompt.as_mut() {
        prompt.render(frame, full);
    }
}

fn draw_landing(frame: &mut Frame, area: Rect) {
    let lines = [
        "",
        "dossier",
        "ask questions, get answers grounded in your documents",
        "",
        "tab cycles focus · enter opens the selected project",
        "n new project · u upload · ctrl+o sources · ctrl+c quit",
    ];
    let text = lines.join("\n");
    let paragraph = Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .centered();

    // Vertically center the hint block
    let offset = area.height.saturating_sub(lines.len() as u16) / 2;
    let centered = Rect {
        y: area.y + offset,
        height: area.height.saturating_sub(offset),
        ..area
    };
    frame.render_widget(paragraph, centered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{project, test_app};
    use crate::tui::TuiState;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_layout_geometry() {
        let panes = layout(Rect::new(0, 0, 120, 40));
        assert_eq!(panes.title.height, 1);
        assert_eq!(panes.projects.width, SIDEBAR_WIDTH);
        assert_eq!(panes.documents.width, SIDEBAR_WIDTH);
        assert_eq!(panes.input.height, 3);
        assert_eq!(panes.chat.width, 120 - SIDEBAR_WIDTH);
        // Sidebar and chat cover the full height below the title
        assert_eq!(panes.projects.height + panes.documents.height, 39);
        assert_eq!(panes.chat.height + panes.input.height, 39);
    }

    #[test]
    fn test_draw_ui_landing() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = test_app();
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, &app, &mut tui, 0)).unwrap();
    }

    #[test]
    fn test_draw_ui_with_selected_project() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        app.projects = vec![project("proj_1", "Filings")];
        app.selected_project = Some("proj_1".to_string());
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, &app, &mut tui, 3)).unwrap();
    }
}
