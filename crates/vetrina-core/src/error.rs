// ── Core error types and normalization ──
//
// User-facing errors from vetrina-core. Consumers never see raw reqwest
// failures or JSON parse errors: Result-returning operations translate
// through `CoreError`, and the view path carries `ErrorInfo` -- a
// display-safe `{code?, message}` pair that is total over every failure
// the fetch layer can produce.

use thiserror::Error;

/// Fallback message when a failure carries no usable detail.
const GENERIC_FETCH_MESSAGE: &str = "An error occurred while fetching products.";

// ── CoreError ────────────────────────────────────────────────────────

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach catalog service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Catalog request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Product not found: {identifier}")]
    ProductNotFound { identifier: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Catalog API error: {message}")]
    Api {
        message: String,
        /// The service-specific error code, if the body carried one.
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vetrina_api::Error> for CoreError {
    fn from(err: vetrina_api::Error) -> Self {
        if err.is_not_found() {
            return CoreError::ProductNotFound {
                identifier: String::new(),
            };
        }

        match err {
            vetrina_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            vetrina_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vetrina_api::Error::Server {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            vetrina_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

// ── ErrorInfo (view-path normalization) ──────────────────────────────

/// Display-safe failure description carried by error views.
///
/// Normalization is total: every fetch failure maps to a non-empty,
/// human-readable message. Status-bearing failures render as
/// `"Error <status>: <detail>"`; everything else falls back to the
/// failure's own message or a generic default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: Option<String>,
    pub message: String,
}

impl ErrorInfo {
    /// Normalize a fetch-layer failure for display.
    pub fn from_api(err: &vetrina_api::Error) -> Self {
        match err {
            vetrina_api::Error::Server {
                status,
                message,
                code,
            } => {
                let detail = if message.is_empty() {
                    GENERIC_FETCH_MESSAGE
                } else {
                    message.as_str()
                };
                Self {
                    code: code.clone(),
                    message: format!("Error {status}: {detail}"),
                }
            }
            vetrina_api::Error::Transport(e) => match e.status() {
                Some(status) => Self {
                    code: None,
                    message: format!("Error {status}: {GENERIC_FETCH_MESSAGE}"),
                },
                None => Self {
                    code: None,
                    message: e.to_string(),
                },
            },
            other => {
                let message = other.to_string();
                Self {
                    code: None,
                    message: if message.is_empty() {
                        GENERIC_FETCH_MESSAGE.to_owned()
                    } else {
                        message
                    },
                }
            }
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
