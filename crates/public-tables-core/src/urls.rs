//! Path building for table pages and the privacy toggle.
//!
//! Path segments use tilde-encoding: ASCII letters, digits, `_` and `-` pass
//! through, a space becomes `+`, and every other byte becomes `~XX`.

use std::fmt::Write;

fn is_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Encode a single path segment.
pub fn tilde_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if is_safe(byte) {
            out.push(byte as char);
        } else if byte == b' ' {
            out.push('+');
        } else {
            // Writing to a String cannot fail.
            let _ = write!(out, "~{:02X}", byte);
        }
    }
    out
}

/// Decode a tilde-encoded path segment.
///
/// Returns `None` for malformed escapes or bytes that are not UTF-8.
pub fn tilde_decode(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'~' => {
                let hex = segment.get(i + 1..i + 3)?;
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

/// Canonical URL of a table page.
pub fn table_path(database: &str, table: &str) -> String {
    format!("/{}/{}", tilde_encode(database), tilde_encode(table))
}

/// URL of the privacy toggle page for a table.
pub fn privacy_path(database: &str, table: &str) -> String {
    format!(
        "/-/public-table/{}/{}",
        tilde_encode(database),
        tilde_encode(table)
    )
}
