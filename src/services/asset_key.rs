//! Storage key construction for uploaded assets.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

/// 256 bits from the thread-local CSPRNG. Uniqueness relies entirely on this width.
const ASSET_ID_BYTES: usize = 32;

const FALLBACK_EXTENSION: &str = "bin";

/// Media types we know how to name, mapped to their file extension.
const KNOWN_MEDIA_TYPES: [(&str, &str); 7] = [
    ("video/mp4", "mp4"),
    ("video/quicktime", "mov"),
    ("video/webm", "webm"),
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Generate a fresh `<random-id>.<ext>` key for an asset of `media_type`.
///
/// Never fails: unknown or malformed media types get a `.bin` extension.
pub fn new_asset_key(media_type: &str) -> String {
    let mut id = [0u8; ASSET_ID_BYTES];
    rand::rng().fill_bytes(&mut id);
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(id),
        extension_for(media_type)
    )
}

/// `"<prefix>/<key>"`.
pub fn with_prefix(prefix: &str, key: &str) -> String {
    format!("{}/{}", prefix, key)
}

/// Extension for a media type, ignoring parameters such as `; codecs=...`.
pub fn extension_for(media_type: &str) -> &'static str {
    let essence = normalize_media_type(media_type);
    KNOWN_MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == essence)
        .map(|(_, ext)| *ext)
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Inverse lookup used when serving stored assets.
pub fn media_type_for_key(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    KNOWN_MEDIA_TYPES
        .iter()
        .find(|(_, known)| known.eq_ignore_ascii_case(ext))
        .map(|(media_type, _)| *media_type)
        .unwrap_or("application/octet-stream")
}

/// Lowercased `type/subtype` with parameters stripped.
pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
