use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::api::{Document, DocumentStatus};
use crate::tui::component::Component;

/// Sidebar list of the selected project's documents.
///
/// Render-only, like [`super::project_panel::ProjectPanel`]. Each row shows
/// the processing status glyph, the filename, and the size.
pub struct DocumentPanel<'a> {
    pub documents: &'a [Document],
    pub selected: usize,
    pub focused: bool,
    pub loading: bool,
    pub has_project: bool,
}

/// Formats a byte count the way humans read file sizes.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    match bytes {
        0 => String::from("-"),
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{:.1} MB", b as f64 / MB as f64),
    }
}

fn status_color(status: DocumentStatus) -> Color {
    match status {
        DocumentStatus::Ready => Color::Green,
        DocumentStatus::Uploading | DocumentStatus::Processing => Color::Yellow,
        DocumentStatus::Error => Color::Red,
    }
}

impl DocumentPanel<'_> {
    fn item(&self, doc: &Document) -> ListItem<'static> {
        let mut spans = vec![
            Span::styled(
                format!("{} ", doc.status.glyph()),
                Style::default().fg(status_color(doc.status)),
            ),
            Span::raw(doc.filename.clone()),
            Span::styled(
                format!(" {}", format_size(doc.size)),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if let Some(err) = &doc.error_message {
            spans.push(Span::styled(
                format!(" ({err})"),
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
            ));
        }
        ListItem::new(Line::from(spans))
    }
}

impl Component for DocumentPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let title = if self.focused {
            "documents │ u:upload d:del"
        } else {
            "documents"
        };
        let block = Block::bordered()
            .title(title)
            .border_style(border_style)
            .title_style(border_style);

        let hint = if !self.has_project {
            Some("select a project first")
        } else if self.loading {
            Some("loading…")
        } else if self.documents.is_empty() {
            Some("no documents · press u")
        } else {
            None
        };
        if let Some(hint) = hint {
            let paragraph = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self.documents.iter().map(|d| self.item(d)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(Some(self.selected.min(self.documents.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
