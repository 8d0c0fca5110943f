use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum YoutubeApiError {
    Youtube(StatusCode, ErrorDetail),
    Internal(ApiError),
}

impl YoutubeApiError {
    /// Machine-readable reason of the first error item, e.g. `subscriptionDuplicate`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            YoutubeApiError::Youtube(_, detail) => detail.reason(),
            YoutubeApiError::Internal(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            YoutubeApiError::Youtube(status, _) => Some(*status),
            YoutubeApiError::Internal(_) => None,
        }
    }
}

impl From<ApiError> for YoutubeApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, body) | ApiError::ServerError(status, body) => {
                let detail = match serde_json::from_str::<ErrorResponse>(&body) {
                    Ok(response) => response.error,
                    // Not Google's error envelope (proxies, HTML error pages)
                    Err(_) => ErrorDetail {
                        code: status.as_u16(),
                        message: body,
                        errors: Vec::new(),
                    },
                };
                YoutubeApiError::Youtube(status, detail)
            }
            e => YoutubeApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for YoutubeApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YoutubeApiError::Internal(e) => write!(f, "Internal error: {}", e),
            YoutubeApiError::Youtube(status, detail) => {
                write!(f, "({}) {}", status, detail.message)
            }
        }
    }
}

impl std::error::Error for YoutubeApiError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

impl ErrorDetail {
    pub fn reason(&self) -> Option<&str> {
        self.errors.first().map(|item| item.reason.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub message: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_error_envelope_is_parsed() {
        let body = r#"{
            "error": {
                "code": 400,
                "message": "The subscription that you are trying to create already exists.",
                "errors": [{
                    "message": "The subscription that you are trying to create already exists.",
                    "domain": "youtube.subscription",
                    "reason": "subscriptionDuplicate"
                }]
            }
        }"#;

        let err = YoutubeApiError::from(ApiError::ClientError(
            StatusCode::BAD_REQUEST,
            body.to_string(),
        ));

        assert_eq!(err.reason(), Some("subscriptionDuplicate"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_non_json_error_body_is_kept_verbatim() {
        let err = YoutubeApiError::from(ApiError::ServerError(
            StatusCode::BAD_GATEWAY,
            "upstream unavailable".to_string(),
        ));

        match err {
            YoutubeApiError::Youtube(status, detail) => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(detail.code, 502);
                assert_eq!(detail.message, "upstream unavailable");
                assert!(detail.reason().is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
