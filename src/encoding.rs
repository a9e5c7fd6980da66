//! Normalizing raw CSV bytes to UTF-8 before parsing.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use simdutf8::basic::from_utf8;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check if the given bytes are valid UTF-8.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM.
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(UTF8_BOM)
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// UTF-8 text ready for the CSV parser.
#[derive(Debug, Clone)]
pub struct Decoded<'a> {
    /// UTF-8 bytes with any leading BOM removed.
    pub bytes: Cow<'a, [u8]>,
    /// Source encoding, when the input had to be transcoded.
    pub transcoded_from: Option<&'static Encoding>,
}

/// Decode `data` to UTF-8, transcoding when it is not already UTF-8.
///
/// UTF-16 input is recognized by its BOM. Any other non-UTF-8 input is
/// guessed with chardetng. A leading UTF-8 BOM is stripped either way, so
/// the first header name never carries it.
pub fn decode(data: &[u8]) -> Decoded<'_> {
    let source = source_encoding(data);

    let bytes = match source {
        None => Cow::Borrowed(skip_bom(data)),
        Some(encoding) => {
            let (text, _, _) = encoding.decode(data);
            let mut owned = text.into_owned().into_bytes();
            if has_utf8_bom(&owned) {
                owned.drain(..UTF8_BOM.len());
            }
            Cow::Owned(owned)
        }
    };

    Decoded {
        bytes,
        transcoded_from: source,
    }
}

/// Returns the encoding to transcode from, or `None` if `data` can be used as-is.
fn source_encoding(data: &[u8]) -> Option<&'static Encoding> {
    // chardetng does not handle UTF-16 well, so trust the BOM
    if data.starts_with(&[0xFF, 0xFE]) {
        return Some(encoding_rs::UTF_16LE);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        return Some(encoding_rs::UTF_16BE);
    }

    if is_utf8(data) {
        return None;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let guess = detector.guess(None, true);

    // Mostly UTF-8 with a few invalid bytes; let the parser deal with it
    if guess == encoding_rs::UTF_8 {
        None
    } else {
        Some(guess)
    }
}
