//! OpenAPI-only schema mirrors.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Documentation mirror of the domain error envelope.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable category, e.g. `invalid_request`.
    #[schema(example = "invalid_request")]
    pub code: String,
    /// Human-readable message.
    #[schema(example = "year must be between 1900 and 2027")]
    pub message: String,
    /// Optional structured context such as the offending field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
