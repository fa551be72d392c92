//! Hex text at the adapter boundary.

use crate::error::PipelineError;

/// Parse `0x`-prefixed (or bare) hex calldata. Surrounding whitespace is
/// ignored; an empty string yields an empty buffer.
pub fn parse_calldata_hex(text: &str) -> Result<Vec<u8>, PipelineError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() % 2 != 0 {
        return Err(PipelineError::InvalidHex {
            reason: format!("odd number of hex digits ({})", digits.len()),
        });
    }
    hex::decode(digits).map_err(|e| PipelineError::InvalidHex {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prefix_and_whitespace() {
        assert_eq!(parse_calldata_hex(" 0xA9059cbb\n").unwrap(), vec![0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(parse_calldata_hex("a9059cbb").unwrap(), vec![0xa9, 0x05, 0x9c, 0xbb]);
        assert!(parse_calldata_hex("0x").unwrap().is_empty());
    }

    #[test]
    fn rejects_odd_length_and_bad_digits() {
        assert!(matches!(
            parse_calldata_hex("0xabc"),
            Err(PipelineError::InvalidHex { .. })
        ));
        assert!(matches!(
            parse_calldata_hex("0xzz"),
            Err(PipelineError::InvalidHex { .. })
        ));
        assert!(matches!(
            parse_calldata_hex("0x a9"),
            Err(PipelineError::InvalidHex { .. })
        ));
    }
}
