//! One-way masking of sensitive fields.
//!
//! Sensitive values are replaced with a deterministic digest before anything
//! else sees them: equal inputs produce equal digests, so downstream joins on
//! masked columns keep working, while the cleartext is never stored or logged.

use sha2::{Digest, Sha256};

use crate::types::MaskedValue;

/// Masks a sensitive value into an opaque, fixed-width token.
///
/// Computes the SHA-256 digest of the UTF-8 bytes of `value` and returns it
/// hex-encoded. The transformation is irreversible; there is no decode path.
pub fn mask_pii(value: &str) -> MaskedValue {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());

    MaskedValue::new(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_is_deterministic() {
        assert_eq!(mask_pii("1.2.3.4"), mask_pii("1.2.3.4"));
    }

    #[test]
    fn distinct_inputs_produce_distinct_digests() {
        assert_ne!(mask_pii("1.2.3.4"), mask_pii("1.2.3.5"));
        assert_ne!(mask_pii("device-a"), mask_pii("device-b"));
    }

    #[test]
    fn digest_is_fixed_width_lowercase_hex() {
        for value in ["", "1.2.3.4", "a-rather-long-device-identifier-string"] {
            let masked = mask_pii(value);
            assert_eq!(masked.as_str().len(), 64);
            assert!(masked
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn digest_never_equals_cleartext() {
        for value in ["1.2.3.4", "d1", "en-US"] {
            assert_ne!(mask_pii(value).as_str(), value);
        }
    }
}
