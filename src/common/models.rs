use serde::Serialize;
use utoipa::ToSchema;

/// Generic acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
        }
    }

    #[must_use]
    pub fn success_with(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
        }
    }
}
