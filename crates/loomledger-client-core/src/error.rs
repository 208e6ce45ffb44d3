use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    ServiceUnavailable,
    Network,
    Decode,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::RateLimited => "rate_limited",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Unknown => "unknown",
        }
    }

    pub fn retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::Network
        )
    }
}

pub fn classify_status(status_code: u16) -> ApiErrorKind {
    match status_code {
        0 => ApiErrorKind::Network,
        401 => ApiErrorKind::Unauthorized,
        403 => ApiErrorKind::Forbidden,
        404 => ApiErrorKind::NotFound,
        400 | 409 | 422 => ApiErrorKind::Validation,
        429 => ApiErrorKind::RateLimited,
        502..=504 => ApiErrorKind::ServiceUnavailable,
        _ => ApiErrorKind::Unknown,
    }
}

/// Failed API call. `detail` carries the server's `detail` payload verbatim
/// (a string or a list of validation errors) so it can be shown as a toast.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status_code: u16,
    pub kind: ApiErrorKind,
    pub message: String,
    pub detail: Option<Value>,
    pub retryable: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ApiError {
    pub fn from_response(status_code: u16, raw_body: &str) -> Self {
        let detail = serde_json::from_str::<ApiErrorBody>(raw_body)
            .ok()
            .and_then(|body| body.detail)
            .filter(|detail| !detail.is_null());
        let message = detail
            .as_ref()
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("request failed with status {status_code}"));
        let kind = classify_status(status_code);
        Self {
            status_code,
            kind,
            message,
            detail,
            retryable: kind.retryable(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            kind: ApiErrorKind::Network,
            message: message.into(),
            detail: None,
            retryable: true,
        }
    }

    pub fn decode(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            kind: ApiErrorKind::Decode,
            message: message.into(),
            detail: None,
            retryable: false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_detail_becomes_message() {
        let error = ApiError::from_response(400, r#"{"detail":"Customer code already exists"}"#);
        assert_eq!(error.kind, ApiErrorKind::Validation);
        assert_eq!(error.message, "Customer code already exists");
        assert_eq!(error.detail, Some(json!("Customer code already exists")));
        assert!(!error.retryable);
    }

    #[test]
    fn validation_list_detail_is_kept_verbatim() {
        let error = ApiError::from_response(
            422,
            r#"{"detail":[{"loc":["body","email"],"msg":"invalid"}]}"#,
        );
        assert_eq!(error.message, "request failed with status 422");
        assert_eq!(
            error.detail,
            Some(json!([{"loc": ["body", "email"], "msg": "invalid"}]))
        );
    }

    #[test]
    fn non_json_body_has_no_detail() {
        let error = ApiError::from_response(503, "<html>bad gateway</html>");
        assert_eq!(error.kind, ApiErrorKind::ServiceUnavailable);
        assert_eq!(error.detail, None);
        assert!(error.retryable);
    }

    #[test]
    fn unauthorized_is_detected_by_status() {
        assert!(ApiError::from_response(401, "{}").is_unauthorized());
        assert!(!ApiError::network("offline").is_unauthorized());
    }
}
