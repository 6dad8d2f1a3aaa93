use std::error;
use std::fmt;

/// Convenient result type for ingestion operations using [`IngestError`] as the error type.
pub type IngestResult<T> = Result<T, IngestError>;

/// Main error type for ingestion operations.
///
/// [`IngestError`] pairs an [`ErrorKind`] with a static description and optional
/// dynamic detail. The kind is the load-bearing part: the ingestion loop decides
/// whether a failure is scoped to one message or fatal to the run by matching on
/// [`IngestError::kind`].
#[derive(Debug, Clone)]
pub struct IngestError {
    repr: ErrorRepr,
}

/// Internal representation of error data.
///
/// Users should not interact with this type directly but use [`IngestError`]
/// methods instead.
#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Error with kind and static description
    WithDescription(ErrorKind, &'static str),
    /// Error with kind, static description, and dynamic detail
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
}

/// Specific categories of errors that can occur during ingestion.
///
/// [`ErrorKind::MissingField`] is the only recoverable, message-scoped kind:
/// the loop skips the offending message and carries on. Every other kind is
/// fatal to the run.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    // Normalization errors
    MissingField,
    InvalidData,
    ConversionError,
    DeserializationError,

    // Queue transport errors
    QueueReceiveFailed,
    QueueAckFailed,

    // Storage errors
    DestinationConnectionFailed,
    DestinationQueryFailed,

    // Configuration & IO errors
    ConfigError,
    IoError,

    // Unknown / Uncategorized
    Unknown,
}

impl IngestError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
        }
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for IngestError {
    fn eq(&self, other: &IngestError) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;

                Ok(())
            }
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;
                f.write_str(" -> ")?;
                detail.fmt(f)?;

                Ok(())
            }
        }
    }
}

impl error::Error for IngestError {}

/// Creates an [`IngestError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for IngestError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> IngestError {
        IngestError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

/// Creates an [`IngestError`] from an error kind, static description, and dynamic detail.
impl From<(ErrorKind, &'static str, String)> for IngestError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> IngestError {
        IngestError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

// Common standard library error conversions

/// Converts [`std::io::Error`] to [`IngestError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> IngestError {
        IngestError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::IoError,
                "I/O error occurred",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`serde_json::Error`] to [`IngestError`] with appropriate error kind.
///
/// Maps to [`ErrorKind::DeserializationError`] for syntax/data failures based on
/// error classification.
impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> IngestError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Data
            | serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        IngestError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, description, err.to_string()),
        }
    }
}

/// Converts [`std::num::ParseIntError`] to [`IngestError`] with [`ErrorKind::ConversionError`].
impl From<std::num::ParseIntError> for IngestError {
    fn from(err: std::num::ParseIntError) -> IngestError {
        IngestError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::ConversionError,
                "Integer parsing failed",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`chrono::ParseError`] to [`IngestError`] with [`ErrorKind::ConversionError`].
impl From<chrono::ParseError> for IngestError {
    fn from(err: chrono::ParseError) -> IngestError {
        IngestError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::ConversionError,
                "Chrono parse failed",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`tokio_postgres::Error`] to [`IngestError`] with appropriate error kind.
///
/// Maps errors based on PostgreSQL SQLSTATE codes: connection-class failures map
/// to [`ErrorKind::DestinationConnectionFailed`], everything else to
/// [`ErrorKind::DestinationQueryFailed`].
impl From<tokio_postgres::Error> for IngestError {
    fn from(err: tokio_postgres::Error) -> IngestError {
        let (kind, description) = match err.code() {
            Some(sqlstate) => {
                use tokio_postgres::error::SqlState;

                match *sqlstate {
                    // Connection errors (08xxx)
                    SqlState::CONNECTION_EXCEPTION
                    | SqlState::CONNECTION_DOES_NOT_EXIST
                    | SqlState::CONNECTION_FAILURE
                    | SqlState::SQLCLIENT_UNABLE_TO_ESTABLISH_SQLCONNECTION
                    | SqlState::SQLSERVER_REJECTED_ESTABLISHMENT_OF_SQLCONNECTION => (
                        ErrorKind::DestinationConnectionFailed,
                        "PostgreSQL connection error",
                    ),

                    // Authentication errors (28xxx)
                    SqlState::INVALID_AUTHORIZATION_SPECIFICATION | SqlState::INVALID_PASSWORD => (
                        ErrorKind::DestinationConnectionFailed,
                        "PostgreSQL authentication failed",
                    ),

                    // Resource errors (53xxx)
                    SqlState::INSUFFICIENT_RESOURCES
                    | SqlState::OUT_OF_MEMORY
                    | SqlState::TOO_MANY_CONNECTIONS => (
                        ErrorKind::DestinationConnectionFailed,
                        "PostgreSQL resource limitation",
                    ),

                    // Everything else, including constraint violations (23xxx),
                    // is a failed write from the worker's point of view.
                    _ => (
                        ErrorKind::DestinationQueryFailed,
                        "PostgreSQL query failed",
                    ),
                }
            }
            // No SQL state means connection issue
            None => (
                ErrorKind::DestinationConnectionFailed,
                "PostgreSQL connection failed",
            ),
        };

        IngestError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, description, err.to_string()),
        }
    }
}
