//! Modal text prompt used for the two form-style interactions: naming a
//! new project and entering file paths to upload.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::source_panel::centered_rect;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// "name | optional description"
    NewProject,
    /// Space-separated file paths, one upload request per path.
    UploadFiles,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::NewProject => "new project",
            PromptKind::UploadFiles => "upload files",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            PromptKind::NewProject => "name, optionally followed by | description",
            PromptKind::UploadFiles => "space-separated paths · every file is uploaded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptEvent {
    Submit(PromptKind, String),
    Cancel,
}

pub struct Prompt {
    pub kind: PromptKind,
    buffer: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            buffer: String::new(),
        }
    }
}

impl EventHandler for Prompt {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PromptEvent> {
        match event {
            TuiEvent::Escape => Some(PromptEvent::Cancel),
            TuiEvent::Submit => Some(PromptEvent::Submit(self.kind, self.buffer.clone())),
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Paste(data) => {
                self.buffer.push_str(&data.replace(['\n', '\r'], " "));
                None
            }
            _ => None,
        }
    }
}

impl Component for Prompt {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let panel = Rect {
            height: u16::min(4, area.height),
            ..centered_rect(area, 60, 10)
        };
        frame.render_widget(Clear, panel);

        let block = Block::bordered()
            .title(self.kind.title())
            .border_style(Style::default().fg(Color::Cyan));

        let lines = vec![
            Line::from(Span::raw(format!("{}▏", self.buffer))),
            Line::from(Span::styled(
                format!("{} · enter:ok esc:cancel", self.kind.hint()),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), panel);
    }
}
