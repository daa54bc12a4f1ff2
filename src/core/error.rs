//! Core error types.

use std::fmt;

/// Errors raised while handling a request inside a controller.
///
/// Every variant is fatal to the current request cycle. The front controller
/// maps them to an HTTP response via [`Error::status`].
#[derive(Debug)]
pub enum Error {
    /// No action with this name is registered on the controller.
    MethodNotFound { controller: String, action: String },

    /// The action exists but is not publicly callable.
    MethodNotAccessible { controller: String, action: String },

    /// A required action parameter was absent (or null) in the request.
    MissingParameter(String),

    /// A parameter was present but could not be coerced to the declared type.
    InvalidParameter { name: String, expected: &'static str },

    /// A secure cookie operation needs `app.secret_key`, which is unset.
    MissingSecretConfiguration,

    /// String-keyed property lookup for a name the controller does not expose.
    UndefinedPropertyAccess { controller: String, property: String },

    /// The view service failed to render a template.
    View(String),

    /// JSON serialization error.
    Json(serde_json::Error),

    /// I/O error.
    Io(std::io::Error),

    /// HTTP error.
    Http(http::Error),

    /// Custom error with message.
    Custom(String),
}

impl Error {
    /// HTTP status the front controller answers with for this error.
    pub fn status(&self) -> http::StatusCode {
        match self {
            Error::MethodNotFound { .. } | Error::MethodNotAccessible { .. } => {
                http::StatusCode::NOT_FOUND
            }
            Error::MissingParameter(_) | Error::InvalidParameter { .. } => {
                http::StatusCode::BAD_REQUEST
            }
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MethodNotFound { controller, action } => {
                write!(f, "action does not exist: {}::{}Action", controller, action)
            }
            Error::MethodNotAccessible { controller, action } => {
                write!(f, "action is not public: {}::{}Action", controller, action)
            }
            Error::MissingParameter(name) => write!(f, "missing request parameter: {}", name),
            Error::InvalidParameter { name, expected } => {
                write!(f, "invalid request parameter {}: expected {}", name, expected)
            }
            Error::MissingSecretConfiguration => {
                write!(f, "secret key is not configured: set app.secret_key")
            }
            Error::UndefinedPropertyAccess {
                controller,
                property,
            } => write!(f, "undefined property: {}::${}", controller, property),
            Error::View(msg) => write!(f, "view error: {}", msg),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::Http(e)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Custom(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
