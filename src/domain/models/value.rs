//! Typed views over raw config bytes.
//!
//! A config entry carries no type of its own: the same bytes may be read as
//! text, an integer, a flag, or a structured object. Each decoder names the
//! key it was reading so errors point at the offending entry.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::{ConfigClientError, ConfigClientResult};

/// Decode bytes as UTF-8 text.
pub fn decode_string(key: &str, raw: &[u8]) -> ConfigClientResult<String> {
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|e| ConfigClientError::decode(key, "string", e))
}

/// Decode bytes as a base-10 integer literal.
///
/// Surrounding ASCII whitespace and a leading `+`/`-` are accepted. Binary
/// packed integers are not recognised.
pub fn decode_int(key: &str, raw: &[u8]) -> ConfigClientResult<i64> {
    let text = std::str::from_utf8(raw).map_err(|e| ConfigClientError::decode(key, "integer", e))?;
    text.trim()
        .parse::<i64>()
        .map_err(|e| ConfigClientError::decode(key, "integer", e))
}

/// Truthiness of the raw bytes: any non-empty value is `true`.
///
/// A single `0x00` byte or the text `false` both read as `true`.
pub const fn decode_bool(raw: &[u8]) -> bool {
    !raw.is_empty()
}

/// Deserialize a JSON-encoded structured value.
pub fn decode_object<T: DeserializeOwned>(key: &str, raw: &[u8]) -> ConfigClientResult<T> {
    serde_json::from_slice(raw).map_err(|e| ConfigClientError::decode(key, "object", e))
}

/// Serialize a structured value to the encoding `decode_object` reads.
pub fn encode_object<T: Serialize + ?Sized>(key: &str, value: &T) -> ConfigClientResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ConfigClientError::decode(key, "object", e))
}
