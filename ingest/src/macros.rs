//! Macros for ingestion error handling.
//!
//! Provides convenience macros for creating and returning [`crate::error::IngestError`]
//! instances with reduced boilerplate for common error handling patterns.

/// Creates an [`crate::error::IngestError`] from error kind and description.
///
/// This macro provides a concise way to create [`crate::error::IngestError`] instances
/// with either static descriptions or additional dynamic detail information.
#[macro_export]
macro_rules! ingest_error {
    ($kind:expr, $desc:expr) => {
        IngestError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        IngestError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Creates and returns an [`crate::error::IngestError`] from the current function.
///
/// This macro combines error creation with early return, reducing boilerplate
/// when handling error conditions that should immediately terminate execution.
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::ingest_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::ingest_error!($kind, $desc, $detail))
    };
}
