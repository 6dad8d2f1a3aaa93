use std::fmt;

use chrono::NaiveDate;

/// An opaque, irreversible digest of a sensitive value.
///
/// [`MaskedValue`] is the only form in which sensitive fields travel through
/// the pipeline: it is produced by [`crate::masking::mask_pii`] and compared
/// for equality by digest. There is deliberately no accessor that recovers the
/// original value, because none exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedValue(String);

impl MaskedValue {
    /// Wraps an already-computed hex digest.
    pub(crate) fn new(digest: String) -> Self {
        Self(digest)
    }

    /// Returns the hex-encoded digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaskedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized login event derived from one queue message.
///
/// [`LoginEvent`] is only ever constructed by the normalizer, which guarantees
/// that all required fields were present in the source message and that the
/// sensitive fields have already been masked. One [`LoginEvent`] maps to one
/// row in the destination table.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginEvent {
    /// Opaque user identifier, passed through verbatim.
    pub user_id: String,
    /// Device category the login originated from, passed through verbatim.
    pub device_type: String,
    /// Masked form of the client IP address.
    pub masked_ip: MaskedValue,
    /// Masked form of the device identifier.
    pub masked_device_id: MaskedValue,
    /// Locale of the client, passed through verbatim.
    pub locale: String,
    /// Major version of the client application.
    pub app_version: i32,
    /// Account creation date.
    pub create_date: NaiveDate,
}
