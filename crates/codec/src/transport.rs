use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};

use crate::error::CodecError;

/// Wrap a compressed fingerprint for text transport: URL-safe alphabet
/// (`-` and `_`), no padding, applied to the whole blob.
pub fn encode_base64(data: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(data)
}

pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, CodecError> {
    Ok(BASE64_URL_SAFE_NO_PAD.decode(encoded)?)
}
