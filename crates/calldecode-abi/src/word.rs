//! Elementary encoding rules for single 32-byte words.
//!
//! Decoding is strict everywhere:
//! - `uintN`: bits above N must be zero
//! - `intN`: bits above N-1 must be a sign extension of bit N-1
//! - `address`: the upper 12 bytes must be zero
//! - `bool`: only 0 and 1 are accepted
//! - `bytesN`: bytes after the first N must be zero

use alloy_primitives::{Address, I256, U256};
use calldecode_core::{CodecError, WORD_SIZE};

pub type Word = [u8; WORD_SIZE];

/// `true` for 8, 16, ..., 256.
pub fn is_valid_width(bits: u16) -> bool {
    bits != 0 && bits <= 256 && bits % 8 == 0
}

pub fn decode_uint(word: &Word, bits: u16, position: usize) -> Result<U256, CodecError> {
    if !is_valid_width(bits) {
        return Err(CodecError::type_decode(position, format!("invalid type uint{bits}")));
    }
    let value = U256::from_be_bytes(*word);
    if bits < 256 && value >> usize::from(bits) != U256::ZERO {
        return Err(CodecError::type_decode(
            position,
            format!("value does not fit in uint{bits}"),
        ));
    }
    Ok(value)
}

pub fn decode_int(word: &Word, bits: u16, position: usize) -> Result<I256, CodecError> {
    if !is_valid_width(bits) {
        return Err(CodecError::type_decode(position, format!("invalid type int{bits}")));
    }
    let raw = U256::from_be_bytes(*word);
    if !is_sign_extended(raw, bits) {
        return Err(CodecError::type_decode(
            position,
            format!("value is not a sign-extended int{bits}"),
        ));
    }
    Ok(I256::from_raw(raw))
}

/// Bits `bits-1 ..= 255` of `raw` must be all zeros or all ones.
/// `bits` must be a valid width.
fn is_sign_extended(raw: U256, bits: u16) -> bool {
    if bits >= 256 {
        return true;
    }
    let shift = usize::from(bits.saturating_sub(1));
    let high = raw >> shift;
    high == U256::ZERO || high == U256::MAX >> shift
}

pub fn decode_address(word: &Word, position: usize) -> Result<Address, CodecError> {
    if word[..12].iter().any(|b| *b != 0) {
        return Err(CodecError::type_decode(
            position,
            "address has non-zero upper 12 bytes",
        ));
    }
    Ok(Address::from_slice(&word[12..]))
}

pub fn decode_bool(word: &Word, position: usize) -> Result<bool, CodecError> {
    let (last, rest) = word.split_last().ok_or_else(|| CodecError::type_decode(position, "empty word"))?;
    match (rest.iter().all(|b| *b == 0), *last) {
        (true, 0) => Ok(false),
        (true, 1) => Ok(true),
        _ => Err(CodecError::type_decode(
            position,
            format!("bool word must be 0 or 1, got 0x{}", hex_word(word)),
        )),
    }
}

pub fn decode_fixed_bytes(word: &Word, len: u8, position: usize) -> Result<Vec<u8>, CodecError> {
    let n = usize::from(len);
    if n == 0 || n > WORD_SIZE {
        return Err(CodecError::type_decode(position, format!("invalid type bytes{len}")));
    }
    if word[n..].iter().any(|b| *b != 0) {
        return Err(CodecError::type_decode(
            position,
            format!("bytes{len} has non-zero padding"),
        ));
    }
    Ok(word[..n].to_vec())
}

/// Read an offset or length word as `usize`.
///
/// Values that do not fit the host's address space can never be valid
/// positions in `available` bytes, so they report `OffsetOutOfBounds`.
pub fn read_usize(word: &Word, position: usize, available: usize) -> Result<usize, CodecError> {
    let out_of_bounds = CodecError::OffsetOutOfBounds {
        position,
        available,
    };
    if word[..WORD_SIZE - 8].iter().any(|b| *b != 0) {
        return Err(out_of_bounds);
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD_SIZE - 8..]);
    usize::try_from(u64::from_be_bytes(low)).map_err(|_| out_of_bounds)
}

pub fn encode_uint(value: U256, bits: u16) -> Result<Word, CodecError> {
    if !is_valid_width(bits) {
        return Err(encode_error(format!("invalid type uint{bits}")));
    }
    if bits < 256 && value >> usize::from(bits) != U256::ZERO {
        return Err(encode_error(format!("{value} does not fit in uint{bits}")));
    }
    Ok(value.to_be_bytes::<WORD_SIZE>())
}

pub fn encode_int(value: I256, bits: u16) -> Result<Word, CodecError> {
    if !is_valid_width(bits) {
        return Err(encode_error(format!("invalid type int{bits}")));
    }
    let raw = value.into_raw();
    if !is_sign_extended(raw, bits) {
        return Err(encode_error(format!("{value} does not fit in int{bits}")));
    }
    Ok(raw.to_be_bytes::<WORD_SIZE>())
}

pub fn encode_address(address: &Address) -> Word {
    let mut word = [0u8; WORD_SIZE];
    word[12..].copy_from_slice(address.as_slice());
    word
}

pub fn encode_bool(value: bool) -> Word {
    let mut word = [0u8; WORD_SIZE];
    word[WORD_SIZE - 1] = u8::from(value);
    word
}

pub fn encode_fixed_bytes(bytes: &[u8]) -> Result<Word, CodecError> {
    if bytes.is_empty() || bytes.len() > WORD_SIZE {
        return Err(encode_error(format!("bytes{} is not a valid fixed bytes type", bytes.len())));
    }
    let mut word = [0u8; WORD_SIZE];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(word)
}

pub fn encode_usize(value: usize) -> Word {
    U256::from(value).to_be_bytes::<WORD_SIZE>()
}

fn encode_error(reason: String) -> CodecError {
    CodecError::Encode { reason }
}

fn hex_word(word: &Word) -> String {
    word.iter().map(|b| format!("{b:02x}")).collect()
}
