//! Backend access layer: wire types plus one thin HTTP function per endpoint.

pub mod client;
pub mod types;

pub use client::{ApiError, BackendClient, MAX_UPLOAD_BYTES};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, Conversation, Document, DocumentStatus, FileType,
    HistoryMessage, MessageMetadata, Project, Role, SourceRef, StatusResponse, flatten_history,
};
