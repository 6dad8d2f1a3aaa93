//! Normalization of raw queue message bodies into [`LoginEvent`]s.
//!
//! The error taxonomy here is deliberately asymmetric. A required field that is
//! absent fails with [`ErrorKind::MissingField`], which the ingestion loop
//! treats as a message-scoped, recoverable condition. A field that is present
//! but malformed (a non-numeric version, a bad date) is a different class of
//! failure and propagates as fatal.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::bail;
use crate::error::{ErrorKind, IngestError, IngestResult};
use crate::masking::mask_pii;
use crate::types::LoginEvent;

/// Strict textual format of the `create_date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Version string substituted when `app_version` is absent.
const DEFAULT_APP_VERSION: &str = "0";

/// Date substituted when `create_date` is absent.
const DEFAULT_CREATE_DATE: NaiveDate = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

/// Parses a raw message body into a normalized [`LoginEvent`].
///
/// The body must be a JSON object with string values for `user_id`,
/// `device_type`, `ip`, `device_id` and `locale`, and optionally `app_version`
/// (dot-delimited version string, only the leading segment is kept) and
/// `create_date` (`YYYY-MM-DD`). The sensitive `ip` and `device_id` fields are
/// masked before they are stored in the event.
///
/// Pure function over its input; no side effects.
pub fn parse_login_event(body: &str) -> IngestResult<LoginEvent> {
    let data: Map<String, Value> = serde_json::from_str(body)?;

    let user_id = required_str(&data, "user_id")?.to_string();
    let device_type = required_str(&data, "device_type")?.to_string();
    let masked_ip = mask_pii(required_str(&data, "ip")?);
    let masked_device_id = mask_pii(required_str(&data, "device_id")?);
    let locale = required_str(&data, "locale")?.to_string();

    // Only the major component of the version string is stored.
    let app_version_str = optional_str(&data, "app_version")?.unwrap_or(DEFAULT_APP_VERSION);
    let app_version: i32 = leading_segment(app_version_str).parse()?;

    let create_date = match optional_str(&data, "create_date")? {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)?,
        None => DEFAULT_CREATE_DATE,
    };

    Ok(LoginEvent {
        user_id,
        device_type,
        masked_ip,
        masked_device_id,
        locale,
        app_version,
        create_date,
    })
}

/// Extracts a required string field from the parsed body.
///
/// An absent (or JSON null) field is the recoverable [`ErrorKind::MissingField`]
/// case; a field that is present with a non-string value is not.
fn required_str<'a>(data: &'a Map<String, Value>, field: &'static str) -> IngestResult<&'a str> {
    match data.get(field) {
        None | Some(Value::Null) => {
            bail!(ErrorKind::MissingField, "Required field is absent", field)
        }
        Some(value) => as_str(value, field),
    }
}

/// Extracts an optional string field from the parsed body.
///
/// Returns `None` when the field is absent; a present non-string value is
/// still [`ErrorKind::InvalidData`].
fn optional_str<'a>(
    data: &'a Map<String, Value>,
    field: &'static str,
) -> IngestResult<Option<&'a str>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_str(value, field).map(Some),
    }
}

fn as_str<'a>(value: &'a Value, field: &'static str) -> IngestResult<&'a str> {
    let Some(value) = value.as_str() else {
        bail!(
            ErrorKind::InvalidData,
            "Field value is not a string",
            field
        );
    };

    Ok(value)
}

/// Returns the text before the first `.`, or the whole string if there is none.
fn leading_segment(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_body() -> &'static str {
        r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","app_version":"2.1.0","create_date":"2023-05-01"}"#
    }

    #[test]
    fn parses_full_message() {
        let event = parse_login_event(full_body()).unwrap();

        assert_eq!(event.user_id, "u1");
        assert_eq!(event.device_type, "ios");
        assert_eq!(event.locale, "en-US");
        assert_eq!(event.app_version, 2);
        assert_eq!(
            event.create_date,
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
    }

    #[test]
    fn sensitive_fields_are_masked() {
        let event = parse_login_event(full_body()).unwrap();

        assert_eq!(event.masked_ip, mask_pii("1.2.3.4"));
        assert_eq!(event.masked_device_id, mask_pii("d1"));
        assert_ne!(event.masked_ip.as_str(), "1.2.3.4");
        assert_ne!(event.masked_device_id.as_str(), "d1");
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let body = r#"{"user_id":"u2","device_type":"android","ip":"5.6.7.8","device_id":"d2","locale":"en-US"}"#;
        let event = parse_login_event(body).unwrap();

        assert_eq!(event.app_version, 0);
        assert_eq!(
            event.create_date,
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
    }

    #[test]
    fn version_is_truncated_to_leading_segment() {
        let body = r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","app_version":"3.2.1"}"#;
        let event = parse_login_event(body).unwrap();

        assert_eq!(event.app_version, 3);
    }

    #[test]
    fn undotted_version_is_parsed_whole() {
        let body = r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","app_version":"7"}"#;
        let event = parse_login_event(body).unwrap();

        assert_eq!(event.app_version, 7);
    }

    #[test]
    fn missing_required_fields_fail_as_missing_field() {
        for field in ["user_id", "device_type", "ip", "device_id", "locale"] {
            let mut data: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(full_body()).unwrap();
            data.remove(field);
            let body = serde_json::to_string(&data).unwrap();

            let err = parse_login_event(&body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingField, "field: {field}");
            assert_eq!(err.detail(), Some(field));
        }
    }

    #[test]
    fn null_required_field_fails_as_missing_field() {
        let body = r#"{"user_id":null,"device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US"}"#;
        let err = parse_login_event(body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.detail(), Some("user_id"));
    }

    #[test]
    fn malformed_version_is_not_a_missing_field() {
        let body = r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","app_version":"beta.1"}"#;
        let err = parse_login_event(body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConversionError);
    }

    #[test]
    fn malformed_date_is_not_a_missing_field() {
        let body = r#"{"user_id":"u1","device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US","create_date":"05/01/2023"}"#;
        let err = parse_login_event(body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConversionError);
    }

    #[test]
    fn non_string_required_field_is_invalid_data() {
        let body = r#"{"user_id":42,"device_type":"ios","ip":"1.2.3.4","device_id":"d1","locale":"en-US"}"#;
        let err = parse_login_event(body).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn non_object_body_is_a_deserialization_error() {
        for body in ["not json", "[1,2,3]", "\"a string\""] {
            let err = parse_login_event(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DeserializationError, "body: {body}");
        }
    }
}
