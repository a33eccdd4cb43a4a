//! HTTP access functions for the backend.
//!
//! One method per endpoint, nothing more: every call is a single request
//! whose JSON body maps straight onto the records in [`super::types`].
//! Sequencing, retries and persistence are the backend's problem.

use std::fmt;
use std::path::Path;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::types::{
    ChatRequest, ChatResponse, Conversation, CreateProjectRequest, Document, Project,
    StatusResponse,
};

/// Hard upload limit enforced by the backend; checked here first so an
/// oversized file fails before any bytes leave the machine.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Errors that can occur while talking to the backend.
#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, refused connection, timeout).
    Network(String),
    /// The backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// The backend answered 2xx but the body didn't match the expected shape.
    Parse(String),
    /// Local file could not be read for upload.
    Io(String),
    /// File rejected client-side (size limit) before any request was made.
    InvalidFile(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Io(msg) => write!(f, "file error: {msg}"),
            ApiError::InvalidFile(msg) => write!(f, "invalid file: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Thin client over the backend's REST endpoints.
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Creates a client for the given base URL (trailing slash tolerated).
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks the status and decodes the JSON body, mapping failures onto
    /// the [`ApiError`] taxonomy.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Backend error: {} - {}", status, body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// `GET /api/projects`
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/api/projects").await
    }

    /// `POST /api/projects`
    pub async fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, ApiError> {
        let body = CreateProjectRequest {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        let url = format!("{}/api/projects", self.base_url);
        info!("Creating project '{name}'");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// `DELETE /api/projects/{project_id}`
    pub async fn delete_project(&self, project_id: &str) -> Result<StatusResponse, ApiError> {
        let url = format!("{}/api/projects/{project_id}", self.base_url);
        info!("Deleting project {project_id}");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// `GET /api/documents/project/{project_id}`
    pub async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, ApiError> {
        self.get_json(&format!("/api/documents/project/{project_id}"))
            .await
    }

    /// `POST /api/documents/upload?project_id={id}`
    ///
    /// Uploads exactly one file per call. Callers with several files issue
    /// one call per file; there is no batch form.
    pub async fn upload_document(
        &self,
        project_id: &str,
        path: &Path,
    ) -> Result<Document, ApiError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| ApiError::Io(format!("not a file path: {}", path.display())))?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Io(format!("{}: {e}", path.display())))?;

        if bytes.len() as u64 > MAX_UPLOAD_BYTES {
            return Err(ApiError::InvalidFile(format!(
                "{filename} is larger than the {} MB upload limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        info!(
            "Uploading {filename} ({} bytes) to project {project_id}",
            bytes.len()
        );

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}/api/documents/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("project_id", project_id)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// `DELETE /api/documents/{document_id}`
    pub async fn delete_document(&self, document_id: &str) -> Result<StatusResponse, ApiError> {
        let url = format!("{}/api/documents/{document_id}", self.base_url);
        info!("Deleting document {document_id}");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// `POST /api/chat/query`
    pub async fn send_query(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = format!("{}/api/chat/query", self.base_url);
        info!(
            "Chat query for project {} (include_sources={}, max_chunks={})",
            request.project_id, request.include_sources, request.max_chunks
        );
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// `GET /api/chat/history/{project_id}`
    pub async fn fetch_history(&self, project_id: &str) -> Result<Vec<Conversation>, ApiError> {
        self.get_json(&format!("/api/chat/history/{project_id}"))
            .await
    }
}
