use std::io::Write;
use std::path::PathBuf;

use dossier::api::types::flatten_history;
use dossier::api::{ApiError, BackendClient, ChatRequest, DocumentStatus, FileType, Role};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(server.uri())
}

/// Writes a small throwaway file and returns its path.
fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dossier-test-{}-{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

fn project_json(id: &str, name: &str, file_count: u32) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": "2024-01-15T10:30:00Z",
        "file_count": file_count
    })
}

fn document_json(id: &str, project_id: &str, filename: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "project_id": project_id,
        "filename": filename,
        "file_type": "pdf",
        "uploaded_at": "2024-01-15T10:31:00Z",
        "size": 4096,
        "status": status
    })
}

// ============================================================================
// Project Endpoints
// ============================================================================

#[tokio::test]
async fn test_list_projects_parses_backend_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            project_json("proj_1", "Q3 Filings", 2),
            project_json("proj_2", "Research Notes", 0),
        ])))
        .mount(&mock_server)
        .await;

    let projects = client_for(&mock_server).list_projects().await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, "proj_1");
    assert_eq!(projects[0].file_count, 2);
    assert_eq!(projects[1].name, "Research Notes");
}

#[tokio::test]
async fn test_create_project_sends_name_and_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .and(body_json(json!({
            "name": "Q3 Filings",
            "description": "quarterly reports"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(
            "proj_new",
            "Q3 Filings",
            0,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let project = client_for(&mock_server)
        .create_project("Q3 Filings", Some("quarterly reports"))
        .await
        .unwrap();

    assert_eq!(project.id, "proj_new");
    assert_eq!(project.file_count, 0);
}

#[tokio::test]
async fn test_delete_project_hits_the_right_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/projects/proj_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Project 'Q3 Filings' deleted successfully"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = client_for(&mock_server)
        .delete_project("proj_1")
        .await
        .unwrap();
    assert!(status.success);
}

#[tokio::test]
async fn test_backend_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).list_projects().await;
    match result {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("database unavailable"));
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).list_projects().await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

// ============================================================================
// Document Endpoints
// ============================================================================

#[tokio::test]
async fn test_list_documents_scoped_to_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents/project/proj_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            document_json("doc_1", "proj_1", "guide.pdf", "ready"),
            document_json("doc_2", "proj_1", "spec.pdf", "processing"),
        ])))
        .mount(&mock_server)
        .await;

    let documents = client_for(&mock_server)
        .list_documents("proj_1")
        .await
        .unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].file_type, FileType::Pdf);
    assert_eq!(documents[0].status, DocumentStatus::Ready);
    assert_eq!(documents[1].status, DocumentStatus::Processing);
}

#[tokio::test]
async fn test_upload_document_posts_multipart_with_project_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .and(query_param("project_id", "proj_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json(
            "doc_up",
            "proj_1",
            "notes.txt",
            "processing",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let file = temp_file("notes.txt", b"some notes");
    let document = client_for(&mock_server)
        .upload_document("proj_1", &file)
        .await
        .unwrap();
    std::fs::remove_file(&file).ok();

    assert_eq!(document.id, "doc_up");
    assert_eq!(document.status, DocumentStatus::Processing);
}

#[tokio::test]
async fn test_uploading_three_files_makes_three_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .and(query_param("project_id", "proj_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document_json(
            "doc_up",
            "proj_1",
            "any.pdf",
            "processing",
        )))
        .expect(3) // one request per file, none silently dropped
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let files = [
        temp_file("one.pdf", b"pdf one"),
        temp_file("two.pdf", b"pdf two"),
        temp_file("three.pdf", b"pdf three"),
    ];
    for file in &files {
        client.upload_document("proj_1", file).await.unwrap();
    }
    for file in &files {
        std::fs::remove_file(file).ok();
    }
    // The .expect(3) above is verified when the mock server drops
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let mock_server = MockServer::start().await;

    let result = client_for(&mock_server)
        .upload_document("proj_1", std::path::Path::new("/nonexistent/nope.pdf"))
        .await;
    assert!(matches!(result, Err(ApiError::Io(_))));
}

#[tokio::test]
async fn test_upload_oversized_file_rejected_before_sending() {
    // No mock mounted: a request reaching the server would 404 and the
    // error kind below would differ.
    let mock_server = MockServer::start().await;

    let file = temp_file("big.pdf", &vec![0u8; 10 * 1024 * 1024 + 1]);
    let result = client_for(&mock_server).upload_document("proj_1", &file).await;
    std::fs::remove_file(&file).ok();

    assert!(matches!(result, Err(ApiError::InvalidFile(_))));
}

#[tokio::test]
async fn test_delete_document_hits_the_right_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/documents/doc_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "deleted"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = client_for(&mock_server)
        .delete_document("doc_1")
        .await
        .unwrap();
    assert!(status.success);
}

// ============================================================================
// Chat Endpoints
// ============================================================================

#[tokio::test]
async fn test_send_query_round_trip_with_sources() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .and(body_json(json!({
            "project_id": "proj_1",
            "query": "What changed in Q3?",
            "include_sources": true,
            "max_chunks": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "response": "Revenue grew 12% quarter over quarter.",
            "conversation_id": "conv_42",
            "sources": [
                {
                    "document_id": "doc_1",
                    "filename": "q3_report.pdf",
                    "excerpt": "Revenue grew 12%...",
                    "page": 4,
                    "relevance_score": 0.91
                }
            ],
            "message_metadata": {
                "project_id": "proj_1",
                "timestamp": "2024-01-15T10:30:05Z"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ChatRequest {
        project_id: "proj_1".to_string(),
        query: "What changed in Q3?".to_string(),
        conversation_id: None,
        include_sources: true,
        max_chunks: 5,
    };
    let response = client_for(&mock_server).send_query(&request).await.unwrap();

    assert!(response.success);
    assert_eq!(response.conversation_id, "conv_42");
    let sources = response.sources.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].filename, "q3_report.pdf");
    assert_eq!(sources[0].page, Some(4));
}

#[tokio::test]
async fn test_fetch_history_and_flatten_preserves_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/chat/history/proj_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "conversation_id": "conv_a",
                "project_id": "proj_1",
                "messages": [
                    {"role": "user", "content": "first?", "timestamp": "2024-01-15T10:30:00Z"},
                    {"role": "assistant", "content": "first.", "timestamp": "2024-01-15T10:30:05Z"}
                ],
                "created_at": "2024-01-15T10:30:00Z",
                "updated_at": "2024-01-15T10:30:05Z"
            },
            {
                "conversation_id": "conv_b",
                "project_id": "proj_1",
                "messages": [
                    {"role": "user", "content": "second?", "timestamp": "2024-01-14T09:00:00Z"}
                ],
                "created_at": "2024-01-14T09:00:00Z",
                "updated_at": "2024-01-14T09:00:00Z"
            }
        ])))
        .mount(&mock_server)
        .await;

    let conversations = client_for(&mock_server)
        .fetch_history("proj_1")
        .await
        .unwrap();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0].messages.len(), 2);
    assert_eq!(conversations[0].messages[0].role, Role::User);

    // Backend order rules the flattened view, even though conv_b is older
    let flat = flatten_history(&conversations);
    let contents: Vec<&str> = flat.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first?", "first.", "second?"]);
}

#[tokio::test]
async fn test_query_failure_status_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Project 'proj_x' not found"))
        .mount(&mock_server)
        .await;

    let request = ChatRequest {
        project_id: "proj_x".to_string(),
        query: "anyone home?".to_string(),
        conversation_id: None,
        include_sources: true,
        max_chunks: 5,
    };
    let result = client_for(&mock_server).send_query(&request).await;

    assert!(matches!(result, Err(ApiError::Api { status: 404, .. })));
}
