//! Helpers for arbitrary-precision integers.
//!
//! `BigUint` has no stable human-readable serde representation, so the
//! JSON schema stores big integers as decimal strings via the
//! [`biguint_string`] serde adapter.

use num_bigint::BigUint;

/// Parse a decimal string into a `BigUint` with a readable error message
///
/// **Public** - used by command argument validation
pub fn parse_biguint(text: &str) -> Result<BigUint, String> {
    text.trim()
        .parse::<BigUint>()
        .map_err(|e| format!("'{text}' is not a valid positive integer: {e}"))
}

/// Serde adapter serializing a `BigUint` as a decimal string
pub mod biguint_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<BigUint>().map_err(de::Error::custom)
    }
}
