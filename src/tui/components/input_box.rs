//! # InputBox Component
//!
//! Single-line query input at the bottom of the chat view.
//!
//! The buffer is internal state; focus is a prop set by the event loop each
//! frame. Submission empties the buffer and hands the text to the parent as
//! an [`InputEvent`].

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the InputBox.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed).
    Submit(String),
}

pub struct InputBox {
    /// Text buffer (internal state).
    buffer: String,
    /// Whether the chat pane has focus (prop).
    pub focused: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            focused: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// The tail of the buffer that fits in `width` columns, so the cursor
    /// end of long input stays visible.
    fn visible_tail(&self, width: u16) -> &str {
        let width = width as usize;
        let mut start = self.buffer.len();
        for (idx, _) in self.buffer.char_indices().rev() {
            if self.buffer[idx..].width() > width {
                break;
            }
            start = idx;
        }
        &self.buffer[start..]
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<InputEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Paste(data) => {
                // A query is one line; pasted newlines become spaces
                self.buffer.push_str(&data.replace(['\n', '\r'], " "));
                None
            }
            TuiEvent::Submit => {
                if self.is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title("ask")
            .border_style(border_style)
            .title_style(border_style);

        let inner_width = area.width.saturating_sub(2);
        let visible = self.visible_tail(inner_width.saturating_sub(1));
        let paragraph = Paragraph::new(visible.to_string()).block(block);
        frame.render_widget(paragraph, area);

        if self.focused {
            frame.set_cursor_position(Position {
                x: area.x + 1 + visible.width() as u16,
                y: area.y + 1,
            });
        }
    }
}
