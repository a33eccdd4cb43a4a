//! Wire types for the document Q&A backend.
//!
//! Field names and shapes mirror the backend's JSON exactly (snake_case,
//! RFC3339 timestamps). These are plain records: the backend owns all
//! integrity guarantees, the client only filters by id equality.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File types the backend accepts for upload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Doc,
    Xlsx,
    Xls,
    Txt,
}

impl FileType {
    /// Derives the file type from a filename's extension.
    /// Returns None for extensions the backend rejects.
    pub fn from_filename(filename: &str) -> Option<FileType> {
        let ext = filename.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase())?;
        match ext.as_str() {
            "pdf" => Some(FileType::Pdf),
            "docx" => Some(FileType::Docx),
            "doc" => Some(FileType::Doc),
            "xlsx" => Some(FileType::Xlsx),
            "xls" => Some(FileType::Xls),
            "txt" => Some(FileType::Txt),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Doc => "doc",
            FileType::Xlsx => "xlsx",
            FileType::Xls => "xls",
            FileType::Txt => "txt",
        }
    }
}

/// Processing state of an uploaded document.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploading,
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    /// One-cell glyph used by the document panel.
    pub fn glyph(self) -> &'static str {
        match self {
            DocumentStatus::Uploading => "↑",
            DocumentStatus::Processing => "◌",
            DocumentStatus::Ready => "●",
            DocumentStatus::Error => "✗",
        }
    }
}

/// Who authored a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A named collection of documents with its own chat history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub file_count: u32,
}

/// An uploaded file tracked with its processing status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    pub filename: String,
    pub file_type: FileType,
    pub uploaded_at: DateTime<Utc>,
    pub size: u64,
    pub status: DocumentStatus,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A retrieved document excerpt attached to an assistant answer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SourceRef {
    pub document_id: String,
    pub filename: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub relevance_score: Option<f32>,
}

/// One entry in the chat thread. User messages carry no sources;
/// assistant messages carry whatever the backend returned, verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub project_id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
}

/// A message inside a stored conversation (history only, no id on the wire).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A backend-grouped sequence of chat messages for a project.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Conversation {
    pub conversation_id: String,
    pub project_id: String,
    pub messages: Vec<HistoryMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/chat/query`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub project_id: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub include_sources: bool,
    pub max_chunks: u32,
}

/// Metadata block the backend attaches to a chat answer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MessageMetadata {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response body for `POST /api/chat/query`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub conversation_id: String,
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
    #[serde(default)]
    pub message_metadata: Option<MessageMetadata>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /api/projects`.
#[derive(Serialize, Debug, Clone)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Generic `{success, message}` envelope returned by delete endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// Flattens conversations into one display list.
///
/// Conversations are taken in the order the backend returned them and each
/// conversation's internal message order is preserved. There is no re-sort
/// across conversations by timestamp: the display order is exactly the
/// backend's order, interleaving and all.
pub fn flatten_history(conversations: &[Conversation]) -> Vec<ChatMessage> {
    let mut out = Vec::new();
    for conv in conversations {
        for (i, msg) in conv.messages.iter().enumerate() {
            out.push(ChatMessage {
                id: format!("{}-{}", conv.conversation_id, i),
                project_id: conv.project_id.clone(),
                role: msg.role,
                content: msg.content.clone(),
                timestamp: msg.timestamp,
                sources: None,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn history_msg(role: Role, content: &str, secs: i64) -> HistoryMessage {
        HistoryMessage {
            role,
            content: content.to_string(),
            timestamp: ts(secs),
        }
    }

    #[test]
    fn test_file_type_from_filename() {
        assert_eq!(FileType::from_filename("report.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_filename("notes.TXT"), Some(FileType::Txt));
        assert_eq!(FileType::from_filename("sheet.v2.xlsx"), Some(FileType::Xlsx));
        assert_eq!(FileType::from_filename("archive.zip"), None);
        assert_eq!(FileType::from_filename("no_extension"), None);
    }

    #[test]
    fn test_project_deserializes_backend_json() {
        let json = r#"{
            "id": "proj_abc123",
            "name": "Q3 Filings",
            "description": null,
            "created_at": "2024-01-15T10:30:00Z",
            "updated_at": "2024-01-15T10:30:00Z",
            "file_count": 2
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, "proj_abc123");
        assert_eq!(project.name, "Q3 Filings");
        assert!(project.description.is_none());
        assert_eq!(project.file_count, 2);
    }

    #[test]
    fn test_document_status_and_type_roundtrip() {
        let json = r#"{
            "id": "doc_1",
            "project_id": "proj_1",
            "filename": "guide.pdf",
            "file_type": "pdf",
            "uploaded_at": "2024-01-15T10:30:00Z",
            "size": 1024,
            "status": "processing"
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.file_type, FileType::Pdf);
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert!(doc.page_count.is_none());
    }

    /// Contract test: the query body must serialize exactly as the backend expects.
    #[test]
    fn test_chat_request_serialization() {
        let req = ChatRequest {
            project_id: "proj_1".to_string(),
            query: "What changed in Q3?".to_string(),
            conversation_id: None,
            include_sources: true,
            max_chunks: 5,
        };
        let serialized = serde_json::to_string(&req).unwrap();
        let expected = r#"{"project_id":"proj_1","query":"What changed in Q3?","include_sources":true,"max_chunks":5}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_chat_request_carries_conversation_id_when_set() {
        let req = ChatRequest {
            project_id: "proj_1".to_string(),
            query: "and before that?".to_string(),
            conversation_id: Some("conv_9".to_string()),
            include_sources: false,
            max_chunks: 3,
        };
        let serialized = serde_json::to_string(&req).unwrap();
        assert!(serialized.contains(r#""conversation_id":"conv_9""#));
    }

    #[test]
    fn test_chat_response_parses_sources_and_metadata() {
        let json = r#"{
            "success": true,
            "response": "Based on the documents...",
            "conversation_id": "conv_123",
            "sources": [
                {"document_id": "doc_789", "filename": "product_guide.pdf", "relevance_score": 0.92}
            ],
            "message_metadata": {"project_id": "proj_abc", "timestamp": "2024-01-15T10:30:05Z"}
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        let sources = resp.sources.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].document_id, "doc_789");
        assert!(sources[0].excerpt.is_none());
        assert_eq!(
            resp.message_metadata.unwrap().project_id.as_deref(),
            Some("proj_abc")
        );
    }

    #[test]
    fn test_chat_response_tolerates_missing_optional_fields() {
        let json = r#"{"success":false,"response":"","conversation_id":"conv_1","error":"no documents"}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert!(resp.sources.is_none());
        assert_eq!(resp.error.as_deref(), Some("no documents"));
    }

    #[test]
    fn test_flatten_history_preserves_conversation_order() {
        let conversations = vec![
            Conversation {
                conversation_id: "conv_a".to_string(),
                project_id: "proj_1".to_string(),
                messages: vec![
                    history_msg(Role::User, "first question", 100),
                    history_msg(Role::Assistant, "first answer", 101),
                ],
                created_at: ts(100),
                updated_at: ts(101),
            },
            // Earlier timestamps, but the backend listed it second: it must
            // stay second in the flattened view.
            Conversation {
                conversation_id: "conv_b".to_string(),
                project_id: "proj_1".to_string(),
                messages: vec![
                    history_msg(Role::User, "older question", 10),
                    history_msg(Role::Assistant, "older answer", 11),
                ],
                created_at: ts(10),
                updated_at: ts(11),
            },
        ];

        let flat = flatten_history(&conversations);
        let contents: Vec<&str> = flat.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["first question", "first answer", "older question", "older answer"]
        );
        // Per-message ids are stable and derived from the conversation
        assert_eq!(flat[0].id, "conv_a-0");
        assert_eq!(flat[3].id, "conv_b-1");
    }

    #[test]
    fn test_flatten_history_empty() {
        assert!(flatten_history(&[]).is_empty());
    }
}
