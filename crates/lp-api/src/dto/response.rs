use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Only set on unknown-route errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Envelope wrapped around every `/api` response.
///
/// Successful responses carry a fresh `requestId`; error responses do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_iso(),
            request_id: Some(Uuid::new_v4().to_string()),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: &str, message: String, path: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message,
                path,
            }),
            timestamp: now_iso(),
            request_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Liveness payload. Not enveloped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub environment: String,
}

impl HealthResponse {
    pub fn healthy(version: &str, environment: &str) -> Self {
        Self {
            success: true,
            status: "healthy".to_string(),
            timestamp: now_iso(),
            version: version.to_string(),
            environment: environment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_has_request_id() {
        let json = serde_json::to_value(ApiResponse::ok(MessageResponse::new("done"))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["message"], "done");
        assert!(json.get("error").is_none());
        assert!(Uuid::parse_str(json["requestId"].as_str().unwrap()).is_ok());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_error_envelope_omits_data_and_request_id() {
        let json = serde_json::to_value(ApiResponse::error(
            "NOT_FOUND",
            "Endpoint not found".to_string(),
            Some("/nope".to_string()),
        ))
        .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["path"], "/nope");
        assert!(json.get("data").is_none());
        assert!(json.get("requestId").is_none());
    }
}
