//! Lossy decoding of raw log bytes.
//!
//! Invalid UTF-8 sequences are dropped, not replaced, so a damaged line keeps
//! its remaining text intact for classification. Input that starts with a
//! UTF-16 byte order mark is transcoded instead.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

/// Decode bytes as UTF-8, stripping a leading UTF-8 BOM and dropping every
/// byte that is not part of a valid sequence. UTF-16 input with a BOM is
/// transcoded; malformed code units become U+FFFD.
pub fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
        Some((encoding, bom_len)) => {
            return encoding.decode_without_bom_handling(&bytes[bom_len..]).0;
        }
        None => bytes,
    };

    let valid = Encoding::utf8_valid_up_to(bytes);
    if valid == bytes.len() {
        return UTF_8.decode_without_bom_handling(bytes).0;
    }

    let mut decoded = String::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        let valid = Encoding::utf8_valid_up_to(rest);
        decoded.push_str(&UTF_8.decode_without_bom_handling(&rest[..valid]).0);
        // Skip exactly one offending byte; stray continuation bytes that
        // follow are rejected on the next round.
        rest = rest.get(valid + 1..).unwrap_or_default();
    }
    Cow::Owned(decoded)
}

/// Name of a UTF-16 byte order mark at the start of `bytes`, if present.
pub fn utf16_bom(bytes: &[u8]) -> Option<&'static str> {
    match Encoding::for_bom(bytes) {
        Some((encoding, _)) if encoding == UTF_16LE => Some("UTF-16 LE"),
        Some((encoding, _)) if encoding == UTF_16BE => Some("UTF-16 BE"),
        _ => None,
    }
}
