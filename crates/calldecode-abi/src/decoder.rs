//! ABI decoder.
//!
//! Decodes an argument body (calldata without its selector) against a
//! parameter list. The list is treated as an implicit tuple: a head region
//! holding static values inline and `uint256` offsets for dynamic ones,
//! followed by the tail region those offsets point into.
//!
//! Offsets may alias: several heads can point at the same tail payload.
//! Each decoder carries a budget of words it may materialise, proportional
//! to the input length, so aliased payloads cannot inflate a small input
//! into an unbounded allocation.

use std::{cell::Cell, iter};

use calldecode_core::{CodecError, DecodedValue, ParamType, WORD_SIZE};

use crate::word::{self, Word};

/// Decode `data` against `params`.
///
/// Decoding is all-or-nothing: either every parameter decodes or the first
/// failure is returned. Bytes after the last addressed payload are ignored.
pub fn decode(params: &[ParamType], data: &[u8]) -> Result<Vec<DecodedValue>, CodecError> {
    Decoder::new(data).sequence(params.iter(), 0)
}

/// Decode a single value whose encoding starts at byte 0 of `data`.
pub fn decode_single(ty: &ParamType, data: &[u8]) -> Result<DecodedValue, CodecError> {
    let mut values = Decoder::new(data).sequence(iter::once(ty), 0)?;
    values.pop().ok_or_else(|| CodecError::type_decode(0, "no value decoded"))
}

/// Decoded words allowed per input word. A canonical encoding stays well
/// under 2; only aliased offsets get near the limit.
const MAX_INFLATION: usize = 8;

struct Decoder<'a> {
    buf: &'a [u8],
    /// Words that may still be materialised.
    budget: Cell<usize>,
}

impl<'a> Decoder<'a> {
    fn new(buf: &'a [u8]) -> Self {
        let words = buf.len() / WORD_SIZE + 1;
        Self {
            buf,
            budget: Cell::new(words.saturating_mul(MAX_INFLATION)),
        }
    }

    /// Account for `words` decoded words of the value at `pos`.
    fn charge(&self, words: usize, pos: usize) -> Result<(), CodecError> {
        let left = self
            .budget
            .get()
            .checked_sub(words)
            .ok_or_else(|| self.out_of_bounds(pos))?;
        self.budget.set(left);
        Ok(())
    }

    fn out_of_bounds(&self, position: usize) -> CodecError {
        CodecError::OffsetOutOfBounds {
            position,
            available: self.buf.len(),
        }
    }

    fn word(&self, pos: usize) -> Result<&'a Word, CodecError> {
        let end = pos
            .checked_add(WORD_SIZE)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| self.out_of_bounds(pos))?;
        <&Word>::try_from(&self.buf[pos..end]).map_err(|_| self.out_of_bounds(pos))
    }

    fn read_usize(&self, pos: usize) -> Result<usize, CodecError> {
        word::read_usize(self.word(pos)?, pos, self.buf.len())
    }

    /// Decode a head/tail sequence whose head region starts at `base`.
    /// Dynamic members are addressed relative to `base`.
    fn sequence<'t, I>(&self, types: I, base: usize) -> Result<Vec<DecodedValue>, CodecError>
    where
        I: Iterator<Item = &'t ParamType> + Clone,
    {
        // The whole head region must be present before anything is read.
        let mut head = base;
        for ty in types.clone() {
            let size = ty.head_size().ok_or_else(|| self.out_of_bounds(head))?;
            head = head
                .checked_add(size)
                .filter(|end| *end <= self.buf.len())
                .ok_or_else(|| self.out_of_bounds(head))?;
        }

        let mut values = Vec::with_capacity(types.size_hint().0);
        let mut head = base;
        for ty in types {
            let value = if ty.is_dynamic() {
                let offset = self.read_usize(head)?;
                // Every dynamic payload starts with at least one word.
                let start = base
                    .checked_add(offset)
                    .filter(|start| start.saturating_add(WORD_SIZE) <= self.buf.len())
                    .ok_or_else(|| self.out_of_bounds(head))?;
                self.value(ty, start)?
            } else {
                self.value(ty, head)?
            };
            values.push(value);
            let size = ty.head_size().ok_or_else(|| self.out_of_bounds(head))?;
            head += size;
        }
        Ok(values)
    }

    /// Decode the value of type `ty` whose encoding starts at `pos`.
    fn value(&self, ty: &ParamType, pos: usize) -> Result<DecodedValue, CodecError> {
        if matches!(
            ty,
            ParamType::Uint(_)
                | ParamType::Int(_)
                | ParamType::Address
                | ParamType::Bool
                | ParamType::FixedBytes(_)
        ) {
            self.charge(1, pos)?;
        }
        let value = match ty {
            ParamType::Uint(bits) => {
                DecodedValue::Uint(word::decode_uint(self.word(pos)?, *bits, pos)?, *bits)
            }
            ParamType::Int(bits) => {
                DecodedValue::Int(word::decode_int(self.word(pos)?, *bits, pos)?, *bits)
            }
            ParamType::Address => DecodedValue::Address(word::decode_address(self.word(pos)?, pos)?),
            ParamType::Bool => DecodedValue::Bool(word::decode_bool(self.word(pos)?, pos)?),
            ParamType::FixedBytes(n) => {
                DecodedValue::FixedBytes(word::decode_fixed_bytes(self.word(pos)?, *n, pos)?)
            }
            ParamType::Bytes => DecodedValue::Bytes(self.payload(pos)?.to_vec()),
            ParamType::String => {
                let raw = self.payload(pos)?;
                let s = std::str::from_utf8(raw).map_err(|e| {
                    CodecError::type_decode(pos, format!("string is not valid UTF-8: {e}"))
                })?;
                DecodedValue::String(s.to_string())
            }
            ParamType::Array(elem) => {
                let count = self.read_usize(pos)?;
                let start = pos + WORD_SIZE;
                // Each element needs at least one head word; check the
                // declared count against what is left before allocating.
                let min_size = elem
                    .head_size()
                    .ok_or_else(|| self.out_of_bounds(pos))?
                    .max(WORD_SIZE);
                let remaining = self.buf.len() - start;
                if count.checked_mul(min_size).map_or(true, |need| need > remaining) {
                    return Err(self.out_of_bounds(pos));
                }
                self.charge(count.saturating_add(1), pos)?;
                DecodedValue::Array {
                    elem: (**elem).clone(),
                    values: self.sequence(iter::repeat(elem.as_ref()).take(count), start)?,
                }
            }
            ParamType::FixedArray { elem, len } => DecodedValue::FixedArray {
                elem: (**elem).clone(),
                values: self.sequence(iter::repeat(elem.as_ref()).take(*len), pos)?,
            },
            ParamType::Tuple(fields) => {
                DecodedValue::Tuple(self.sequence(fields.iter().map(|f| &f.ty), pos)?)
            }
        };
        Ok(value)
    }

    /// Length-prefixed `bytes`/`string` content starting at `pos`.
    fn payload(&self, pos: usize) -> Result<&'a [u8], CodecError> {
        let len = self.read_usize(pos)?;
        let start = pos + WORD_SIZE;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| self.out_of_bounds(pos))?;
        self.charge(len.div_ceil(WORD_SIZE) + 1, pos)?;
        Ok(&self.buf[start..end])
    }
}
