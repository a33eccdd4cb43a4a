use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

/// One-line header: app name, selected project, and the status or error
/// text. Errors win over status and show in red.
pub struct TitleBar<'a> {
    pub backend: &'a str,
    pub project_name: Option<&'a str>,
    pub status: &'a str,
    pub error: Option<&'a str>,
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("dossier", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" · {}", self.backend),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if let Some(name) = self.project_name {
            spans.push(Span::raw(format!(" · {name}")));
        }

        match self.error {
            Some(error) => spans.push(Span::styled(
                format!("  ✗ {error} (esc to dismiss)"),
                Style::default().fg(Color::Red),
            )),
            None if !self.status.is_empty() => {
                spans.push(Span::styled(
                    format!("  {}", self.status),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            None => {}
        }

        frame.render_widget(Line::from(spans), area);
    }
}
