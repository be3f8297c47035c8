//! reqwest client for the rights portal REST API
//!
//! Every JSON endpoint answers with an envelope `{success, data, message?}`.
//! The preview endpoint answers with the rendered document itself.

use super::error::ApiError;
use super::traits::PortalApi;
use crate::state::submission::SubmissionPayload;
use crate::state::{Shareholder, Stockbroker, SubmittedForm};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Default portal address
pub const DEFAULT_BASE_URL: &str = "http://localhost:2500";

/// Tokens this long or longer are never sent
pub const MAX_TOKEN_LEN: usize = 1000;

const FALLBACK_EXTENSION: &str = "pdf";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// Error bodies only need the message
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Rendered form returned by the preview endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl std::fmt::Debug for PreviewDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewDocument")
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl PreviewDocument {
    /// File extension for the content type, `pdf` when unknown
    pub fn extension(&self) -> &'static str {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        mime_guess::get_mime_extensions_str(essence)
            .and_then(|exts| exts.first().copied())
            .unwrap_or(FALLBACK_EXTENSION)
    }

    /// Download name for a shareholder's form
    pub fn file_name(&self, reg_account_number: &str) -> String {
        format!("rights-form-{reg_account_number}.{}", self.extension())
    }
}

/// Token to attach, if it is present and reasonably small
pub fn usable_token(token: Option<&str>) -> Option<String> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.len() < MAX_TOKEN_LEN)
        .map(str::to_string)
}

/// Client for communicating with the portal backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client; responses are never served from a cache
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(EXPIRES, HeaderValue::from_static("0"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let token = usable_token(token);
        if token.is_none() {
            tracing::debug!("requests will be sent without a bearer token");
        }

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and unwrap the JSON envelope
    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.authorize(request).send().await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;

        let envelope: Envelope<T> =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                message: envelope.message,
            });
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response envelope has no data".to_string()))
    }
}

/// Map non-2xx responses to `ApiError::Status`, keeping any server message
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .unwrap_or_default()
        .message;
    tracing::warn!(status = status.as_u16(), ?message, "portal request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/pdf")
        .to_string()
}

#[async_trait]
impl PortalApi for ApiClient {
    async fn search_shareholders(
        &self,
        name: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Shareholder>, ApiError> {
        tracing::info!(query = name, page, limit, "searching shareholders");
        // `_t` busts intermediary caches
        let stamp = chrono::Utc::now().timestamp_millis().to_string();
        let page = page.to_string();
        let limit = limit.to_string();
        let request = self.http.get(self.url("/api/shareholders/search")).query(&[
            ("name", name),
            ("page", page.as_str()),
            ("limit", limit.as_str()),
            ("_t", stamp.as_str()),
        ]);
        self.send_envelope(request).await
    }

    async fn get_shareholder(&self, id: &str) -> Result<Shareholder, ApiError> {
        tracing::info!(id, "loading shareholder");
        let request = self.http.get(self.url(&format!("/api/shareholders/{id}")));
        self.send_envelope(request).await
    }

    async fn list_stockbrokers(&self) -> Result<Vec<Stockbroker>, ApiError> {
        let request = self.http.get(self.url("/api/forms/stockbrokers"));
        self.send_envelope(request).await
    }

    async fn submit_rights(&self, payload: SubmissionPayload) -> Result<SubmittedForm, ApiError> {
        tracing::info!(
            fields = payload.fields.len(),
            files = payload.files.len(),
            "submitting rights form"
        );
        let mut form = Form::new();
        for (name, value) in payload.fields {
            form = form.text(name, value);
        }
        for file in payload.files {
            let attachment = file.attachment;
            let part = Part::bytes(attachment.bytes)
                .file_name(attachment.file_name)
                .mime_str(&attachment.mime_type)?;
            form = form.part(file.name, part);
        }

        let request = self.http.post(self.url("/api/forms/submit-rights")).multipart(form);
        self.send_envelope(request).await
    }

    async fn preview_rights(&self, body: serde_json::Value) -> Result<PreviewDocument, ApiError> {
        tracing::info!("requesting form preview");
        let request = self.http.post(self.url("/api/forms/preview-rights")).json(&body);
        let response = self.authorize(request).send().await?;
        let response = check_status(response).await?;

        let content_type = content_type(&response);
        let bytes = response.bytes().await?.to_vec();

        // A JSON answer here is a failure envelope, not a document
        if content_type.starts_with("application/json") {
            let error: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            return Err(ApiError::Rejected {
                message: error.message,
            });
        }

        Ok(PreviewDocument {
            bytes,
            content_type,
        })
    }
}
