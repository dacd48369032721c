//! Log sanitization utilities
//!
//! Keeps record values (TXT payloads, DKIM keys) and signing material
//! from being fully exposed in debug/error logs.

/// Maximum number of bytes of a body to include in log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Bodies within the limit are returned as-is; longer ones keep the first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) plus the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask the signature part of a SigV4 `Authorization` header value.
///
/// `AWS4-HMAC-SHA256 Credential=AKID/..., SignedHeaders=..., Signature=abcd...`
/// keeps everything up to `Signature=` and replaces the hex digest.
pub fn redact_authorization(value: &str) -> String {
    match value.find("Signature=") {
        Some(pos) => format!("{}Signature=***", &value[..pos]),
        None => value.to_string(),
    }
}
