//! Transport failure taxonomy and the error classifier.
//!
//! The remote catalog raises [`TransportError`]; the classifier is the
//! single point where those raw failures become user-displayable
//! [`ClassifiedError`] values. No other component inspects transport
//! failures directly.

use thiserror::Error;

// ============================================================================
// Transport Error
// ============================================================================

/// Raw failure raised by the remote catalog boundary.
///
/// Variants carry their underlying cause as a rendered string so the type
/// stays `Clone` and can flow through state snapshots and watch channels.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Name resolution or connection failure.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Any other I/O-level transport failure.
    #[error("network I/O failed: {0}")]
    Io(String),

    /// Non-success HTTP status.
    #[error("HTTP status {code}")]
    Status {
        /// Numeric HTTP status code.
        code: u16,
    },

    /// Response body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Unclassified failure.
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Error Kind
// ============================================================================

/// Stable category for a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No network connectivity (DNS resolution / connect failure).
    NoConnection,
    /// Request timed out.
    Timeout,
    /// Generic I/O transport failure.
    Network,
    /// HTTP 401 or 403.
    Unauthorized,
    /// HTTP 404.
    NotFound,
    /// HTTP 429.
    RateLimited,
    /// HTTP 5xx.
    ServerError,
    /// Any other HTTP status failure.
    Http,
    /// Response body could not be decoded.
    Decode,
    /// Anything else.
    Unknown,
}

// ============================================================================
// Classified Error
// ============================================================================

/// A normalized, user-displayable failure derived from a transport failure.
///
/// The message is a short sentence suitable for direct display; the raw
/// transport failure is retained as the error source for diagnostics only.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, present only for HTTP status failures.
    pub http_code: Option<u16>,
    /// The original transport failure.
    #[source]
    pub source: TransportError,
}

impl ClassifiedError {
    /// Returns true if this failure is an HTTP status failure.
    pub fn is_http(&self) -> bool {
        self.http_code.is_some()
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Wording used for HTTP 5xx messages.
///
/// Paged loads and single-record lookups surface server failures with
/// different sentences; everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerWording {
    Paging,
    Lookup,
}

/// Classifies a transport failure raised by a paged load.
///
/// Total: every [`TransportError`] maps to exactly one category, and the
/// resulting message is never empty.
pub fn classify(err: TransportError) -> ClassifiedError {
    classify_with(err, ServerWording::Paging)
}

/// Classifies a transport failure raised by a single-record lookup.
///
/// Identical to [`classify`] except for the HTTP 5xx wording.
pub fn classify_lookup(err: TransportError) -> ClassifiedError {
    classify_with(err, ServerWording::Lookup)
}

fn classify_with(err: TransportError, wording: ServerWording) -> ClassifiedError {
    let (kind, message, http_code) = match &err {
        TransportError::Connect(_) => (
            ErrorKind::NoConnection,
            "No internet connection.".to_string(),
            None,
        ),
        TransportError::Timeout => (
            ErrorKind::Timeout,
            "Connection timed out. Please retry.".to_string(),
            None,
        ),
        TransportError::Io(_) => (
            ErrorKind::Network,
            "Network error. Please try again.".to_string(),
            None,
        ),
        TransportError::Status { code } => {
            let code = *code;
            let (kind, message) = match code {
                401 | 403 => (
                    ErrorKind::Unauthorized,
                    format!("You are not authorized (HTTP {code})."),
                ),
                404 => (
                    ErrorKind::NotFound,
                    "Requested resource was not found (404).".to_string(),
                ),
                429 => (
                    ErrorKind::RateLimited,
                    "Too many requests (429). Please wait and retry.".to_string(),
                ),
                c if c >= 500 => (
                    ErrorKind::ServerError,
                    match wording {
                        ServerWording::Paging => {
                            format!("Server error (HTTP {code}). Please try later.")
                        }
                        ServerWording::Lookup => {
                            format!("Server is unreachable (HTTP {code}).")
                        }
                    },
                ),
                _ => (ErrorKind::Http, format!("Request failed (HTTP {code}).")),
            };
            (kind, message, Some(code))
        }
        TransportError::Decode(_) => (
            ErrorKind::Decode,
            "Couldn't read the server response.".to_string(),
            None,
        ),
        TransportError::Other(msg) => {
            let message = if msg.is_empty() {
                "Something went wrong.".to_string()
            } else {
                msg.clone()
            };
            (ErrorKind::Unknown, message, None)
        }
    };

    ClassifiedError {
        kind,
        message,
        http_code,
        source: err,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_no_connection() {
        let e = classify(TransportError::Connect("dns failure".into()));
        assert_eq!(e.kind, ErrorKind::NoConnection);
        assert_eq!(e.message, "No internet connection.");
        assert_eq!(e.http_code, None);
    }

    #[test]
    fn test_timeout() {
        let e = classify(TransportError::Timeout);
        assert_eq!(e.kind, ErrorKind::Timeout);
        assert_eq!(e.message, "Connection timed out. Please retry.");
    }

    #[test]
    fn test_io_is_network() {
        let e = classify(TransportError::Io("connection reset".into()));
        assert_eq!(e.kind, ErrorKind::Network);
        assert_eq!(e.message, "Network error. Please try again.");
    }

    #[test]
    fn test_unauthorized_codes() {
        for code in [401, 403] {
            let e = classify(TransportError::Status { code });
            assert_eq!(e.kind, ErrorKind::Unauthorized);
            assert_eq!(e.message, format!("You are not authorized (HTTP {code})."));
            assert_eq!(e.http_code, Some(code));
        }
    }

    #[test]
    fn test_not_found() {
        let e = classify(TransportError::Status { code: 404 });
        assert_eq!(e.kind, ErrorKind::NotFound);
        assert_eq!(e.message, "Requested resource was not found (404).");
        assert_eq!(e.http_code, Some(404));
    }

    #[test]
    fn test_rate_limited() {
        let e = classify(TransportError::Status { code: 429 });
        assert_eq!(e.kind, ErrorKind::RateLimited);
        assert_eq!(e.message, "Too many requests (429). Please wait and retry.");
    }

    #[test]
    fn test_server_error_paging_wording() {
        let e = classify(TransportError::Status { code: 503 });
        assert_eq!(e.kind, ErrorKind::ServerError);
        assert_eq!(e.message, "Server error (HTTP 503). Please try later.");
        assert_eq!(e.http_code, Some(503));
    }

    #[test]
    fn test_server_error_lookup_wording() {
        let e = classify_lookup(TransportError::Status { code: 500 });
        assert_eq!(e.kind, ErrorKind::ServerError);
        assert_eq!(e.message, "Server is unreachable (HTTP 500).");
        assert_eq!(e.http_code, Some(500));
    }

    #[test]
    fn test_generic_http() {
        let e = classify(TransportError::Status { code: 418 });
        assert_eq!(e.kind, ErrorKind::Http);
        assert_eq!(e.message, "Request failed (HTTP 418).");
        assert_eq!(e.http_code, Some(418));
    }

    #[test]
    fn test_decode_failure() {
        let e = classify(TransportError::Decode("expected value".into()));
        assert_eq!(e.kind, ErrorKind::Decode);
        assert_eq!(e.message, "Couldn't read the server response.");
    }

    #[test]
    fn test_unknown_keeps_own_message() {
        let e = classify(TransportError::Other("tls handshake refused".into()));
        assert_eq!(e.kind, ErrorKind::Unknown);
        assert_eq!(e.message, "tls handshake refused");
    }

    #[test]
    fn test_unknown_empty_message_fallback() {
        let e = classify(TransportError::Other(String::new()));
        assert_eq!(e.kind, ErrorKind::Unknown);
        assert_eq!(e.message, "Something went wrong.");
    }

    #[test]
    fn test_http_code_set_only_for_status_failures() {
        let non_http = [
            TransportError::Connect("x".into()),
            TransportError::Timeout,
            TransportError::Io("x".into()),
            TransportError::Decode("x".into()),
            TransportError::Other("x".into()),
        ];
        for err in non_http {
            assert_eq!(classify(err).http_code, None);
        }
        assert!(classify(TransportError::Status { code: 200 }).http_code.is_some());
    }

    #[test]
    fn test_source_is_preserved() {
        let e = classify(TransportError::Status { code: 500 });
        assert!(matches!(e.source, TransportError::Status { code: 500 }));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn test_display_is_message() {
        let e = classify(TransportError::Timeout);
        assert_eq!(e.to_string(), e.message);
    }
}
