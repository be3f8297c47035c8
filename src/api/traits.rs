//! Trait abstraction for the portal API to enable mocking in tests

use super::client::PreviewDocument;
use super::error::ApiError;
use crate::state::submission::SubmissionPayload;
use crate::state::{Shareholder, Stockbroker, SubmittedForm};
use async_trait::async_trait;

/// Portal backend operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Search shareholders by name
    async fn search_shareholders(
        &self,
        name: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Shareholder>, ApiError>;

    /// Fetch one shareholder record
    async fn get_shareholder(&self, id: &str) -> Result<Shareholder, ApiError>;

    /// Broker reference list
    async fn list_stockbrokers(&self) -> Result<Vec<Stockbroker>, ApiError>;

    /// Post the packaged form as multipart
    async fn submit_rights(&self, payload: SubmissionPayload) -> Result<SubmittedForm, ApiError>;

    /// Render the current form fields to a document
    async fn preview_rights(&self, body: serde_json::Value) -> Result<PreviewDocument, ApiError>;
}
