//! Payload codec between rollup wire hex strings and UTF-8 text.

use thiserror::Error;

const HEX_PREFIX: &str = "0x";

/// Failure to turn a wire payload back into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Payload hex has odd length")]
    OddLength,
    #[error("Payload contains invalid hex character '{0}'")]
    InvalidHex(char),
    #[error("Payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Encode text as a `0x`-prefixed lowercase hex string.
pub fn encode_payload(text: &str) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(text.as_bytes()))
}

/// Decode a hex payload (with or without `0x` prefix) into UTF-8 text.
pub fn decode_payload(payload: &str) -> Result<String, CodecError> {
    let digits = payload
        .strip_prefix(HEX_PREFIX)
        .or_else(|| payload.strip_prefix("0X"))
        .unwrap_or(payload);

    let bytes = hex::decode(digits).map_err(|e| match e {
        hex::FromHexError::OddLength => CodecError::OddLength,
        hex::FromHexError::InvalidHexCharacter { c, .. } => CodecError::InvalidHex(c),
        _ => CodecError::OddLength,
    })?;

    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_prefix() {
        assert_eq!(encode_payload("list"), "0x6c697374");
        assert_eq!(encode_payload(""), "0x");
    }

    #[test]
    fn decodes_with_and_without_prefix() {
        assert_eq!(decode_payload("0x6c697374").unwrap(), "list");
        assert_eq!(decode_payload("0X6C697374").unwrap(), "list");
        assert_eq!(decode_payload("6c697374").unwrap(), "list");
    }

    #[test]
    fn multibyte_text_survives_encoding() {
        let text = "Fund the park 🌳 ünïcode ✓";
        assert_eq!(decode_payload(&encode_payload(text)).unwrap(), text);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(decode_payload("0x6c6"), Err(CodecError::OddLength));
        assert_eq!(decode_payload("0xzz"), Err(CodecError::InvalidHex('z')));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(decode_payload("0xff"), Err(CodecError::InvalidUtf8));
    }
}
