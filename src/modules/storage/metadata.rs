//! Translation between caller metadata and S3 user-metadata headers.
//!
//! Every entry `key: value` travels as the header `x-amz-meta-<key>` with the
//! JSON serialization of `value` as header text.

use std::collections::HashMap;
use std::fmt::Write;

use serde_json::Value;
use tracing::error;

/// Prefix S3 uses for user-defined metadata headers
pub const USER_METADATA_HEADER: &str = "x-amz-meta-";

/// Caller-facing metadata: flat map of keys to JSON values
///
/// Keys travel as HTTP header names, which are case-insensitive. They are
/// stored lowercase, so `Credit` is read back as `credit`, and keys that differ
/// only in case collapse into one header.
pub type MediaMetadata = HashMap<String, Value>;

/// Encode metadata into `(header name, header value)` pairs, keys lowercased.
pub fn encode_metadata(metadata: &MediaMetadata) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = metadata
        .iter()
        .map(|(key, value)| {
            (
                format!("{}{}", USER_METADATA_HEADER, key.to_ascii_lowercase()),
                encode_value(value),
            )
        })
        .collect();
    headers.sort();
    headers
}

/// Serialize a value as JSON restricted to visible ASCII.
///
/// Characters outside ASCII (and DEL) only occur inside JSON strings, where a
/// `\uXXXX` escape denotes the same character.
pub fn encode_value(value: &Value) -> String {
    let json = value.to_string();
    if json.chars().all(is_header_safe) {
        return json;
    }

    let mut out = String::with_capacity(json.len() + 16);
    for c in json.chars() {
        if is_header_safe(c) {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}

fn is_header_safe(c: char) -> bool {
    c.is_ascii() && c != '\u{7f}'
}

/// Rebuild metadata from response headers.
///
/// Headers without the metadata prefix and empty values are ignored. A value
/// that is not valid JSON is logged and dropped.
pub fn decode_metadata<'a, I>(headers: I) -> MediaMetadata
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut metadata = MediaMetadata::new();
    for (name, value) in headers {
        let Some((_, key)) = name.split_once(USER_METADATA_HEADER) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(value) {
            Ok(parsed) => {
                metadata.insert(key.to_string(), parsed);
            }
            Err(e) => {
                error!(
                    "Dropping metadata header '{}' with malformed value: {}",
                    name, e
                );
            }
        }
    }
    metadata
}
