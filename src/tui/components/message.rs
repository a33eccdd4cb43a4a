use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::api::{ChatMessage, Role};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders a single chat message.
///
/// `MessageView` is a transient component: created fresh each frame with
/// the message it renders, holding no state of its own. User messages are
/// shown as plain text; assistant messages go through the markdown
/// renderer. Assistant messages that carry sources advertise it in the
/// title so the source panel shortcut is discoverable.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a ChatMessage,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self { message }
    }

    fn role_style(&self) -> Style {
        match self.message.role {
            Role::User => Style::default().fg(Color::Green),
            Role::Assistant => Style::default().fg(Color::Blue),
        }
    }

    fn title(&self) -> String {
        let when = self.message.timestamp.format("%H:%M");
        match self.message.role {
            Role::User => format!("you {when}"),
            Role::Assistant => {
                let count = self.message.sources.as_ref().map_or(0, |s| s.len());
                if count > 0 {
                    format!("assistant {when} · {count} sources (ctrl+o)")
                } else {
                    format!("assistant {when}")
                }
            }
        }
    }

    fn body(&self) -> Text<'static> {
        let content = self.message.content.trim();
        match self.message.role {
            Role::User => Text::raw(content.to_string()),
            Role::Assistant => markdown::render(content, Color::Blue),
        }
    }

    fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(self.body())
            .style(self.role_style())
            .wrap(Wrap { trim: false })
    }

    /// Predicts rendered height at the given outer width.
    ///
    /// Uses `Paragraph::line_count` on the same paragraph that `render`
    /// draws, so the message list can lay out scroll positions without
    /// rendering anything.
    pub fn height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2 + CONTENT_PAD_H * 2);
        if inner == 0 {
            // Terminal too narrow for borders and padding; still occupy a row
            return 1;
        }
        self.paragraph().line_count(inner) as u16 + VERTICAL_OVERHEAD
    }
}

impl Widget for MessageView<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border_style = self.role_style().add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .title(self.title())
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner, buf);
    }
}
