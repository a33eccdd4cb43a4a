use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState};

use crate::api::Project;
use crate::tui::component::Component;

/// Sidebar list of projects.
///
/// Render-only: the selection index and all key handling live in the event
/// loop, which knows both the app state and the focus. The panel just draws
/// what it's given.
pub struct ProjectPanel<'a> {
    pub projects: &'a [Project],
    pub selected: usize,
    /// Id of the project whose documents/chat are on screen.
    pub active_id: Option<&'a str>,
    pub focused: bool,
}

impl ProjectPanel<'_> {
    fn item(&self, project: &Project) -> ListItem<'static> {
        let marker = if self.active_id == Some(project.id.as_str()) {
            "▸ "
        } else {
            "  "
        };
        let files = match project.file_count {
            1 => " · 1 file".to_string(),
            n => format!(" · {n} files"),
        };
        ListItem::new(Line::from(vec![
            Span::raw(marker),
            Span::raw(project.name.clone()),
            Span::styled(files, Style::default().fg(Color::DarkGray)),
        ]))
    }
}

impl Component for ProjectPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let title = if self.focused {
            "projects │ enter:open n:new d:del r:refresh"
        } else {
            "projects"
        };
        let block = Block::bordered()
            .title(title)
            .border_style(border_style)
            .title_style(border_style);

        if self.projects.is_empty() {
            let hint = ratatui::widgets::Paragraph::new("no projects yet · press n")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let items: Vec<ListItem> = self.projects.iter().map(|p| self.item(p)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(Some(self.selected.min(self.projects.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
