//! HTTP client for the rights portal backend

mod client;
mod error;
mod traits;

pub use client::{ApiClient, PreviewDocument, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use traits::PortalApi;

#[cfg(test)]
pub use traits::MockPortalApi;
