//! URI component escaping with `encodeURIComponent` semantics.

use std::fmt::Write;

/// Characters `encodeURIComponent` leaves untouched besides ASCII alphanumerics.
const UNRESERVED_MARKS: &[u8] = b"-_.!~*'()";

/// Percent-encode `input` the way `encodeURIComponent` does.
///
/// Each UTF-8 byte outside the unreserved set becomes `%XX` with uppercase
/// hex digits, so a space encodes as `%20` rather than `+`.
#[must_use]
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED_MARKS.contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}
