//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::api::{
    BackendClient, ChatMessage, ChatResponse, Conversation, Document, DocumentStatus, FileType,
    HistoryMessage, MessageMetadata, Project, Role, SourceRef,
};
use crate::core::state::App;

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Creates a test App pointed at a client that never gets called.
pub fn test_app() -> App {
    App::new(Arc::new(BackendClient::new(
        "http://localhost:0".to_string(),
    )))
}

pub fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        created_at: ts(1_700_000_000),
        updated_at: ts(1_700_000_000),
        file_count: 0,
    }
}

pub fn document(id: &str, project_id: &str, filename: &str) -> Document {
    Document {
        id: id.to_string(),
        project_id: project_id.to_string(),
        filename: filename.to_string(),
        file_type: FileType::from_filename(filename).unwrap_or(FileType::Txt),
        uploaded_at: ts(1_700_000_100),
        size: 2048,
        status: DocumentStatus::Ready,
        page_count: None,
        error_message: None,
    }
}

pub fn user_message(project_id: &str, content: &str) -> ChatMessage {
    ChatMessage {
        id: format!("msg-user-{}", content.len()),
        project_id: project_id.to_string(),
        role: Role::User,
        content: content.to_string(),
        timestamp: ts(1_700_000_200),
        sources: None,
    }
}

pub fn assistant_message(
    project_id: &str,
    content: &str,
    sources: Option<Vec<SourceRef>>,
) -> ChatMessage {
    ChatMessage {
        id: format!("msg-assistant-{}", content.len()),
        project_id: project_id.to_string(),
        role: Role::Assistant,
        content: content.to_string(),
        timestamp: ts(1_700_000_201),
        sources,
    }
}

pub fn chat_response(
    conversation_id: &str,
    text: &str,
    sources: Option<Vec<SourceRef>>,
) -> ChatResponse {
    ChatResponse {
        success: true,
        response: text.to_string(),
        conversation_id: conversation_id.to_string(),
        sources,
        message_metadata: Some(MessageMetadata {
            project_id: None,
            timestamp: Some(ts(1_700_000_300)),
        }),
        error: None,
    }
}

pub fn conversation(id: &str, project_id: &str, messages: &[(Role, &str)]) -> Conversation {
    Conversation {
        conversation_id: id.to_string(),
        project_id: project_id.to_string(),
        messages: messages
            .iter()
            .enumerate()
            .map(|(i, (role, content))| HistoryMessage {
                role: *role,
                content: content.to_string(),
                timestamp: ts(1_700_000_000 + i as i64),
            })
            .collect(),
        created_at: ts(1_700_000_000),
        updated_at: ts(1_700_000_000 + messages.len() as i64),
    }
}
