//! # MessageList Component
//!
//! Scrollable view of the selected project's chat thread.
//!
//! `MessageList` is a transient component (created each frame) wrapping
//! `&mut MessageListState` (persistent scroll state) and the message slice
//! as props. Heights are predicted through `MessageView::height` so scroll
//! math never requires a render pass.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::ChatMessage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Scroll state for the message list. Persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content.
    pub stick_to_bottom: bool,
    /// Last known content height, for clamping between frames.
    content_height: u16,
    /// Last known viewport height.
    viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true, // Start attached to bottom
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn scroll_by(&mut self, delta: i32) {
        let current = self.scroll_state.offset();
        let y = (current.y as i32 + delta).clamp(0, self.max_offset() as i32) as u16;
        self.scroll_state.set_offset(Position { x: 0, y });
        // Scrolling up detaches from the bottom; reaching it re-attaches
        self.stick_to_bottom = y >= self.max_offset();
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        let page = self.viewport_height.max(1) as i32;
        match event {
            TuiEvent::ScrollUp => self.scroll_by(-1),
            TuiEvent::ScrollDown => self.scroll_by(1),
            TuiEvent::ScrollPageUp => self.scroll_by(-page),
            TuiEvent::ScrollPageDown => self.scroll_by(page),
            _ => return None,
        }
        Some(())
    }
}

/// Transient wrapper rendered once per frame.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub is_sending: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        is_sending: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            is_sending,
            spinner_frame,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // Reserve one column for the scrollbar
        let content_width = area.width.saturating_sub(1);

        let heights: Vec<u16> = self
            .messages
            .iter()
            .map(|m| MessageView::new(m).height(content_width))
            .collect();
        let spinner_height: u16 = if self.is_sending { 1 } else { 0 };
        let total_height: u16 = heights.iter().sum::<u16>() + spinner_height;

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        for (message, height) in self.messages.iter().zip(&heights) {
            let rect = Rect::new(0, y, content_width, *height);
            scroll_view.render_widget(MessageView::new(message), rect);
            y += height;
        }

        if self.is_sending {
            let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            scroll_view.render_widget(
                Span::styled(
                    format!("{spinner} retrieving an answer"),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
                Rect::new(1, y, content_width.saturating_sub(1), 1),
            );
        }

        // Pin to the bottom unless the user scrolled away
        if self.state.stick_to_bottom {
            self.state.scroll_state.set_offset(Position {
                x: 0,
                y: self.state.max_offset(),
            });
        } else {
            let offset = self.state.scroll_state.offset();
            if offset.y > self.state.max_offset() {
                self.state.scroll_state.set_offset(Position {
                    x: 0,
                    y: self.state.max_offset(),
                });
            }
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
