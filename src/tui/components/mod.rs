//! # TUI Components
//!
//! All UI building blocks for the terminal interface.
//!
//! Two patterns live here:
//!
//! - **Render-only components** receive everything as props and draw it:
//!   `TitleBar`, `ProjectPanel`, `DocumentPanel`, `MessageView`,
//!   `SourcePanel`. Key handling for the panels stays in the event loop,
//!   which is the only place that sees both app state and focus.
//! - **Event-driven components** own local state and emit high-level
//!   events: `InputBox` (the query line), `Prompt` (modal text entry),
//!   `MessageListState` (scrolling).
//!
//! Each component file contains its state types, events, rendering, and
//! tests, so one file tells the whole story of one component.

pub mod document_panel;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod project_panel;
pub mod prompt;
pub mod source_panel;
pub mod title_bar;

pub use document_panel::DocumentPanel;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use project_panel::ProjectPanel;
pub use prompt::{Prompt, PromptEvent, PromptKind};
pub use source_panel::SourcePanel;
pub use title_bar::TitleBar;
