//! Provider API wire types.

use serde::Deserialize;

/// A customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Customer ID (`cus_...`).
    pub id: String,
    /// Customer email.
    #[serde(default)]
    pub email: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Metadata attached to the customer.
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Created timestamp (Unix).
    #[serde(default)]
    pub created: i64,
}

/// Parameters for creating a customer.
///
/// Field names here are idiomatic Rust; they are rendered to the provider's
/// form-encoded wire names when the request is built.
#[derive(Debug, Clone, Default)]
pub struct CustomerParams {
    /// Customer email.
    pub email: Option<String>,
    /// Customer name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Metadata key/value pairs.
    pub metadata: Vec<(String, String)>,
}

/// A paginated list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiList<T> {
    /// Object type (always "list").
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    pub has_more: bool,
    /// URL for the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

/// Provider error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Provider error detail.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}
