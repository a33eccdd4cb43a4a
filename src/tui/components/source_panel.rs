use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use crate::api::ChatMessage;
use crate::tui::component::Component;

/// Modal overlay listing the document excerpts behind an assistant answer.
///
/// Opens on the last inspected message and renders its `sources` exactly as
/// the backend returned them: filename, page and relevance when present,
/// then the excerpt text.
pub struct SourcePanel<'a> {
    pub message: &'a ChatMessage,
    pub scroll: u16,
}

/// Centers a `percent_x` by `percent_y` rectangle inside `area`.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y as u32 / 100) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

impl SourcePanel<'_> {
    fn body(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let sources = self.message.sources.as_deref().unwrap_or_default();

        for (i, source) in sources.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }

            let mut heading = vec![Span::styled(
                source.filename.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            let mut details = Vec::new();
            if let Some(page) = source.page {
                details.push(format!("page {page}"));
            }
            if let Some(score) = source.relevance_score {
                details.push(format!("relevance {score:.2}"));
            }
            if !details.is_empty() {
                heading.push(Span::styled(
                    format!("  {}", details.join(" · ")),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(heading));

            match &source.excerpt {
                Some(excerpt) => {
                    for row in excerpt.lines() {
                        lines.push(Line::from(Span::styled(
                            row.to_string(),
                            Style::default().add_modifier(Modifier::DIM),
                        )));
                    }
                }
                None => lines.push(Line::from(Span::styled(
                    "(no excerpt returned)",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ))),
            }
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "This answer cited no sources.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        Text::from(lines)
    }
}

impl Component for SourcePanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let panel = centered_rect(area, 70, 70);
        frame.render_widget(Clear, panel);

        let count = self.message.sources.as_ref().map_or(0, |s| s.len());
        let block = Block::bordered()
            .title(format!("sources ({count}) │ esc:close"))
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(self.body())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, panel);
    }
}
