//! Target URL encoding for the relay endpoint

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::overlay::error::RelayError;

/// Decode the `url` query parameter into the target URL.
///
/// Form decoding of the query string turns `+` into a space, so spaces are
/// mapped back before decoding. No check is made on scheme or host.
pub fn decode_target_url(encoded: &str) -> Result<String, RelayError> {
    let normalized: String = encoded
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    let bytes = STANDARD.decode(normalized.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// Encode a target URL for use as the `url` query parameter.
pub fn encode_target_url(url: &str) -> String {
    STANDARD.encode(url.as_bytes())
}

/// Build the full relay URL for a target, e.g. for pasting into a page.
pub fn relay_url(base: &str, target: &str) -> String {
    let mut out = format!("{}/corsfriendly?url=", base.trim_end_matches('/'));
    for c in encode_target_url(target).chars() {
        match c {
            '+' => out.push_str("%2B"),
            '/' => out.push_str("%2F"),
            '=' => out.push_str("%3D"),
            c => out.push(c),
        }
    }
    out
}
