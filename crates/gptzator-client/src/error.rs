//! Client error types.
//!
//! Every failure surfaced by the SDK is an [`ApiError`]. Raw failures are
//! first captured as a [`Failure`] at the point where they are observed and
//! converted exactly once by [`normalize`].

use serde_json::Value;
use thiserror::Error;

/// Fallback message when nothing better can be extracted.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Fallback message for transport failures without any message.
const TRANSPORT_FALLBACK: &str = "API Error";

/// Broad origin of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP or network failure.
    Transport,
    /// A 401 that could not be recovered.
    Auth,
    /// The remote call succeeded but the payload reports a domain failure.
    Business,
    /// A local deadline elapsed.
    Timeout,
    /// Local or programming failure (bad input, undecodable body, ...).
    Local,
    /// The operation was cancelled by the caller.
    Cancelled,
}

/// Client error type.
///
/// `status` is present only when an HTTP response was received.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message, prefixed with `[context]` when one was given.
    pub message: String,
    /// HTTP status code of the failing response.
    pub status: Option<u16>,
    /// Response body of the failing response, or a domain payload.
    pub data: Option<Value>,
    /// Error origin.
    pub kind: ErrorKind,
}

impl ApiError {
    /// Create an error with no status or data.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            },
            status: None,
            data: None,
            kind,
        }
    }

    /// Create a local error.
    pub fn local(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Local, message)
    }

    /// Create a business error.
    pub fn business(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Business, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a cancellation error.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /// Attach an HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Prepend a bracketed context label to the message.
    pub fn prefixed(mut self, context: &str) -> Self {
        self.message = format!("[{}] {}", context, self.message);
        self
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.kind == ErrorKind::Auth || self.status == Some(401)
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status, Some(status) if status >= 500)
    }

    /// Check if this is a local timeout.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// A raw failure, tagged by where it came from.
#[derive(Debug)]
pub enum Failure {
    /// A non-2xx HTTP response.
    Transport {
        /// Response status.
        status: u16,
        /// Parsed response body, if any.
        body: Option<Value>,
        /// The transport's own description of the failure.
        message: String,
    },
    /// The request never produced a response (connect, timeout, ...).
    Network(reqwest::Error),
    /// Any other error value.
    Generic(Box<dyn std::error::Error + Send + Sync>),
    /// A loosely shaped JSON value.
    Object(Value),
    /// A bare message.
    Message(String),
    /// An already normalized error.
    Api(ApiError),
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::Network(err)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::Generic(Box::new(err))
    }
}

impl From<url::ParseError> for Failure {
    fn from(err: url::ParseError) -> Self {
        Failure::Generic(Box::new(err))
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::Generic(Box::new(err))
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        Failure::Object(value)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Message(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::Message(message.to_string())
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        Failure::Api(err)
    }
}

/// Convert any failure into an [`ApiError`], prefixing `context` if given.
pub fn normalize(failure: impl Into<Failure>, context: Option<&str>) -> ApiError {
    let error = match failure.into() {
        Failure::Transport {
            status,
            body,
            message,
        } => {
            let message = body
                .as_ref()
                .and_then(body_message)
                .map(str::to_string)
                .unwrap_or(message);
            let message = if message.is_empty() {
                TRANSPORT_FALLBACK.to_string()
            } else {
                message
            };
            ApiError {
                message,
                status: Some(status),
                data: body,
                kind: kind_for_status(status),
            }
        }
        Failure::Network(err) => {
            let mut error = ApiError::new(ErrorKind::Transport, err.to_string());
            error.status = err.status().map(|s| s.as_u16());
            error
        }
        Failure::Generic(err) => ApiError::local(err.to_string()),
        Failure::Object(value) => from_object(value),
        Failure::Message(message) => ApiError::local(message),
        Failure::Api(err) => err,
    };

    match context {
        Some(context) => error.prefixed(context),
        None => error,
    }
}

/// Normalize `failure` and return it as an `Err`.
///
/// There is no `Ok` path; callers can use it as the tail expression of an
/// error branch.
pub fn handle_api_error<T>(failure: impl Into<Failure>, context: Option<&str>) -> Result<T> {
    Err(normalize(failure, context))
}

fn kind_for_status(status: u16) -> ErrorKind {
    if status == 401 {
        ErrorKind::Auth
    } else {
        ErrorKind::Transport
    }
}

/// Extract the server-provided message from an error body.
///
/// Accepts `{"message": ".."}` and the collection-style `{"errors": [{"message": ".."}]}`.
fn body_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            body.get("errors")?
                .get(0)?
                .get("message")?
                .as_str()
                .filter(|m| !m.is_empty())
        })
}

fn from_object(value: Value) -> ApiError {
    if let Value::String(message) = value {
        return ApiError::local(message);
    }

    let response = value.get("response");
    if let Some(message) = response
        .and_then(|r| r.get("data"))
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
    {
        let status = response
            .and_then(|r| r.get("status"))
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok());
        return ApiError {
            message: message.to_string(),
            status,
            data: response.and_then(|r| r.get("data")).cloned(),
            kind: status.map_or(ErrorKind::Transport, kind_for_status),
        };
    }

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return ApiError::local(message);
    }

    let message = serde_json::to_string(&value).unwrap_or_else(|_| UNKNOWN_ERROR.to_string());
    ApiError::local(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_error_uses_body_message() {
        let err = normalize(
            Failure::Transport {
                status: 422,
                body: Some(json!({"message": "name is required"})),
                message: "Request failed with status code 422".to_string(),
            },
            None,
        );
        assert_eq!(err.message, "name is required");
        assert_eq!(err.status, Some(422));
        assert_eq!(err.data, Some(json!({"message": "name is required"})));
        assert_eq!(err.kind, ErrorKind::Transport);
    }

    #[test]
    fn test_transport_error_falls_back_to_transport_message() {
        let err = normalize(
            Failure::Transport {
                status: 500,
                body: Some(json!({"oops": true})),
                message: "Request failed with status code 500".to_string(),
            },
            None,
        );
        assert_eq!(err.message, "Request failed with status code 500");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_transport_error_reads_errors_array() {
        let err = normalize(
            Failure::Transport {
                status: 403,
                body: Some(json!({"errors": [{"message": "You are not allowed"}]})),
                message: String::new(),
            },
            None,
        );
        assert_eq!(err.message, "You are not allowed");
    }

    #[test]
    fn test_unauthorized_is_auth_kind() {
        let err = normalize(
            Failure::Transport {
                status: 401,
                body: None,
                message: String::new(),
            },
            None,
        );
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.message, "API Error");
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_generic_error_has_no_status() {
        let io = std::io::Error::other("disk on fire");
        let err = normalize(io, None);
        assert_eq!(err.message, "disk on fire");
        assert_eq!(err.status, None);
        assert!(err.data.is_none());
        assert_eq!(err.kind, ErrorKind::Local);
    }

    #[test]
    fn test_object_with_nested_response() {
        let err = normalize(
            json!({"response": {"status": 404, "data": {"message": "Not Found"}}}),
            None,
        );
        assert_eq!(err.message, "Not Found");
        assert_eq!(err.status, Some(404));
        assert_eq!(err.data, Some(json!({"message": "Not Found"})));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_object_with_message_field() {
        let err = normalize(json!({"message": "plain"}), None);
        assert_eq!(err.message, "plain");
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_unrecognized_object_is_serialized() {
        let err = normalize(json!({"code": 7}), None);
        assert_eq!(err.message, r#"{"code":7}"#);
    }

    #[test]
    fn test_string_is_verbatim() {
        let err = normalize("something broke", None);
        assert_eq!(err.message, "something broke");
    }

    #[test]
    fn test_empty_string_gets_fallback() {
        let err = normalize("", None);
        assert_eq!(err.message, UNKNOWN_ERROR);
    }

    #[test]
    fn test_context_is_prefixed_without_touching_status() {
        let err = normalize(
            Failure::Transport {
                status: 400,
                body: Some(json!({"message": "bad"})),
                message: String::new(),
            },
            Some("AppsApi.get"),
        );
        assert_eq!(err.message, "[AppsApi.get] bad");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.data, Some(json!({"message": "bad"})));
    }

    #[test]
    fn test_normalized_error_only_gains_prefix() {
        let inner = ApiError::business("Generation failed: boom").with_data(json!("boom"));
        let err = normalize(inner, Some("ProjectsApi.call_app"));
        assert_eq!(err.message, "[ProjectsApi.call_app] Generation failed: boom");
        assert_eq!(err.kind, ErrorKind::Business);
        assert_eq!(err.data, Some(json!("boom")));
    }

    #[test]
    fn test_every_origin_yields_nonempty_message_with_prefix() {
        let failures: Vec<Failure> = vec![
            Failure::Transport {
                status: 500,
                body: Some(json!({"message": "x"})),
                message: String::new(),
            },
            std::io::Error::other("io").into(),
            json!({"response": {"status": 400, "data": {"message": "nested"}}}).into(),
            json!({"anything": [1, 2, 3]}).into(),
            json!({}).into(),
            "text".into(),
        ];
        for failure in failures {
            let err = normalize(failure, Some("Ctx.op"));
            assert!(err.message.starts_with("[Ctx.op] "), "{}", err.message);
            assert!(err.message.len() > "[Ctx.op] ".len());
        }
    }

    #[test]
    fn test_handle_api_error_is_always_err() {
        let result: Result<u32> = handle_api_error("nope", Some("Ctx"));
        assert_eq!(result.unwrap_err().message, "[Ctx] nope");
    }
}
