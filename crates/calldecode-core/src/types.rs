//! ABI parameter types and decoded values.
//!
//! `ParamType` is a closed, recursive description of one ABI parameter;
//! `DecodedValue` mirrors its shape one-to-one so every consumer can match
//! exhaustively on both.

use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::WORD_SIZE;

/// An ABI parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Unsigned integer, width in bits (8..=256, step 8).
    Uint(u16),
    /// Signed two's-complement integer, width in bits (8..=256, step 8).
    Int(u16),
    Address,
    Bool,
    /// `bytesN`, length in bytes (1..=32).
    FixedBytes(u8),
    /// Variable-length byte array.
    Bytes,
    String,
    /// `T[len]`
    FixedArray { elem: Box<ParamType>, len: usize },
    /// `T[]`
    Array(Box<ParamType>),
    /// `(T1,T2,...)`
    Tuple(Vec<TupleField>),
}

/// One member of a tuple. The name is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ty: ParamType,
}

impl TupleField {
    pub fn unnamed(ty: ParamType) -> Self {
        Self { name: None, ty }
    }
}

impl ParamType {
    /// Returns `true` if values of this type live in the tail region and
    /// are addressed through an offset word.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray { elem, .. } => elem.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|f| f.ty.is_dynamic()),
            ParamType::Uint(_)
            | ParamType::Int(_)
            | ParamType::Address
            | ParamType::Bool
            | ParamType::FixedBytes(_) => false,
        }
    }

    /// Number of bytes this type occupies in an enclosing head region.
    ///
    /// Dynamic types take a single offset word. Returns `None` if a static
    /// fixed array is so large its size overflows `usize`.
    pub fn head_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            return Some(WORD_SIZE);
        }
        match self {
            ParamType::FixedArray { elem, len } => elem.head_size()?.checked_mul(*len),
            ParamType::Tuple(fields) => fields
                .iter()
                .try_fold(0usize, |acc, f| acc.checked_add(f.ty.head_size()?)),
            _ => Some(WORD_SIZE),
        }
    }

    /// Structural equality that ignores tuple member names.
    pub fn same_shape(&self, other: &ParamType) -> bool {
        match (self, other) {
            (ParamType::Uint(a), ParamType::Uint(b)) | (ParamType::Int(a), ParamType::Int(b)) => {
                a == b
            }
            (ParamType::FixedBytes(a), ParamType::FixedBytes(b)) => a == b,
            (ParamType::Address, ParamType::Address)
            | (ParamType::Bool, ParamType::Bool)
            | (ParamType::Bytes, ParamType::Bytes)
            | (ParamType::String, ParamType::String) => true,
            (
                ParamType::FixedArray { elem: a, len: la },
                ParamType::FixedArray { elem: b, len: lb },
            ) => la == lb && a.same_shape(b),
            (ParamType::Array(a), ParamType::Array(b)) => a.same_shape(b),
            (ParamType::Tuple(a), ParamType::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.ty.same_shape(&y.ty))
            }
            _ => false,
        }
    }
}

/// Canonical type text, as hashed for selectors.
impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Uint(bits) => write!(f, "uint{bits}"),
            ParamType::Int(bits) => write!(f, "int{bits}"),
            ParamType::Address => write!(f, "address"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::FixedBytes(n) => write!(f, "bytes{n}"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::String => write!(f, "string"),
            ParamType::FixedArray { elem, len } => write!(f, "{elem}[{len}]"),
            ParamType::Array(elem) => write!(f, "{elem}[]"),
            ParamType::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A decoded ABI value.
///
/// Integer variants keep their declared bit width and array variants their
/// element type, so the originating `ParamType` can always be recovered
/// (even for empty arrays) and the value re-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DecodedValue {
    Uint(U256, u16),
    Int(I256, u16),
    Address(Address),
    Bool(bool),
    /// `bytesN`; the vector length is N.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    FixedArray {
        elem: ParamType,
        values: Vec<DecodedValue>,
    },
    Array {
        elem: ParamType,
        values: Vec<DecodedValue>,
    },
    Tuple(Vec<DecodedValue>),
}

impl DecodedValue {
    /// Shorthand for a `uint256` value.
    pub fn uint256(v: impl Into<U256>) -> Self {
        DecodedValue::Uint(v.into(), 256)
    }

    /// Reconstruct the type this value was decoded from.
    /// Tuple member names are not retained. A `FixedBytes` value longer
    /// than 32 bytes has no valid type; it reports `bytes255`, which
    /// [`matches`](Self::matches) and the encoder both reject.
    pub fn param_type(&self) -> ParamType {
        match self {
            DecodedValue::Uint(_, bits) => ParamType::Uint(*bits),
            DecodedValue::Int(_, bits) => ParamType::Int(*bits),
            DecodedValue::Address(_) => ParamType::Address,
            DecodedValue::Bool(_) => ParamType::Bool,
            DecodedValue::FixedBytes(b) => {
                ParamType::FixedBytes(u8::try_from(b.len()).unwrap_or(u8::MAX))
            }
            DecodedValue::Bytes(_) => ParamType::Bytes,
            DecodedValue::String(_) => ParamType::String,
            DecodedValue::FixedArray { elem, values } => ParamType::FixedArray {
                elem: Box::new(elem.clone()),
                len: values.len(),
            },
            DecodedValue::Array { elem, .. } => ParamType::Array(Box::new(elem.clone())),
            DecodedValue::Tuple(values) => ParamType::Tuple(
                values
                    .iter()
                    .map(|v| TupleField::unnamed(v.param_type()))
                    .collect(),
            ),
        }
    }

    /// Returns `true` if this value's tag (recursively) matches `ty`.
    pub fn matches(&self, ty: &ParamType) -> bool {
        match (self, ty) {
            (DecodedValue::Uint(_, a), ParamType::Uint(b))
            | (DecodedValue::Int(_, a), ParamType::Int(b)) => a == b,
            (DecodedValue::Address(_), ParamType::Address)
            | (DecodedValue::Bool(_), ParamType::Bool)
            | (DecodedValue::Bytes(_), ParamType::Bytes)
            | (DecodedValue::String(_), ParamType::String) => true,
            (DecodedValue::FixedBytes(b), ParamType::FixedBytes(n)) => {
                (1..=WORD_SIZE).contains(&b.len()) && b.len() == usize::from(*n)
            }
            (
                DecodedValue::FixedArray { elem, values },
                ParamType::FixedArray { elem: ty_elem, len },
            ) => {
                values.len() == *len
                    && elem.same_shape(ty_elem)
                    && values.iter().all(|v| v.matches(ty_elem))
            }
            (DecodedValue::Array { elem, values }, ParamType::Array(ty_elem)) => {
                elem.same_shape(ty_elem) && values.iter().all(|v| v.matches(ty_elem))
            }
            (DecodedValue::Tuple(values), ParamType::Tuple(fields)) => {
                values.len() == fields.len()
                    && values.iter().zip(fields).all(|(v, f)| v.matches(&f.ty))
            }
            _ => false,
        }
    }

    /// Returns `true` if this value is encoded in the tail region.
    pub fn is_dynamic(&self) -> bool {
        match self {
            DecodedValue::Bytes(_) | DecodedValue::String(_) | DecodedValue::Array { .. } => true,
            DecodedValue::FixedArray { elem, .. } => elem.is_dynamic(),
            DecodedValue::Tuple(values) => values.iter().any(DecodedValue::is_dynamic),
            _ => false,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint(v, _) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            DecodedValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Uint(v, _) => write!(f, "{v}"),
            DecodedValue::Int(v, _) => write!(f, "{v}"),
            DecodedValue::Address(a) => write!(f, "{}", a.to_checksum(None)),
            DecodedValue::Bool(b) => write!(f, "{b}"),
            DecodedValue::FixedBytes(b) | DecodedValue::Bytes(b) => {
                write!(f, "0x{}", hex::encode(b))
            }
            DecodedValue::String(s) => write!(f, "{s}"),
            DecodedValue::FixedArray { values, .. } | DecodedValue::Array { values, .. } => {
                let parts: Vec<_> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            DecodedValue::Tuple(values) => {
                let parts: Vec<_> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(types: Vec<ParamType>) -> ParamType {
        ParamType::Tuple(types.into_iter().map(TupleField::unnamed).collect())
    }

    #[test]
    fn canonical_display() {
        assert_eq!(ParamType::Uint(256).to_string(), "uint256");
        assert_eq!(ParamType::FixedBytes(4).to_string(), "bytes4");
        assert_eq!(
            ParamType::Array(Box::new(ParamType::Address)).to_string(),
            "address[]"
        );
        let nested = ParamType::FixedArray {
            elem: Box::new(tuple(vec![ParamType::Bool, ParamType::String])),
            len: 2,
        };
        assert_eq!(nested.to_string(), "(bool,string)[2]");
    }

    #[test]
    fn dynamic_and_head_size() {
        assert!(!ParamType::Uint(8).is_dynamic());
        assert!(ParamType::String.is_dynamic());
        let static_arr = ParamType::FixedArray {
            elem: Box::new(ParamType::Uint(256)),
            len: 3,
        };
        assert!(!static_arr.is_dynamic());
        assert_eq!(static_arr.head_size(), Some(96));

        let dyn_tuple = tuple(vec![ParamType::Uint(8), ParamType::Bytes]);
        assert!(dyn_tuple.is_dynamic());
        assert_eq!(dyn_tuple.head_size(), Some(32));

        let static_tuple = tuple(vec![ParamType::Address, static_arr]);
        assert_eq!(static_tuple.head_size(), Some(128));
    }

    #[test]
    fn head_size_overflow_is_none() {
        let huge = ParamType::FixedArray {
            elem: Box::new(ParamType::FixedArray {
                elem: Box::new(ParamType::Uint(256)),
                len: usize::MAX / 2,
            }),
            len: 4,
        };
        assert_eq!(huge.head_size(), None);
    }

    #[test]
    fn shape_ignores_tuple_names() {
        let named = ParamType::Tuple(vec![TupleField {
            name: Some("amount".into()),
            ty: ParamType::Uint(256),
        }]);
        let unnamed = tuple(vec![ParamType::Uint(256)]);
        assert_ne!(named, unnamed);
        assert!(named.same_shape(&unnamed));
    }

    #[test]
    fn value_matches_its_type() {
        let v = DecodedValue::Array {
            elem: ParamType::Uint(64),
            values: vec![DecodedValue::Uint(U256::from(1u8), 64)],
        };
        assert!(v.matches(&ParamType::Array(Box::new(ParamType::Uint(64)))));
        assert!(!v.matches(&ParamType::Array(Box::new(ParamType::Uint(256)))));
        assert_eq!(v.param_type(), ParamType::Array(Box::new(ParamType::Uint(64))));

        let bad_elem = DecodedValue::Array {
            elem: ParamType::Uint(64),
            values: vec![DecodedValue::Bool(true)],
        };
        assert!(!bad_elem.matches(&ParamType::Array(Box::new(ParamType::Uint(64)))));
    }

    #[test]
    fn oversized_fixed_bytes_never_matches() {
        let v = DecodedValue::FixedBytes(vec![0xab; 300]);
        assert_eq!(v.param_type(), ParamType::FixedBytes(255));
        assert!(!v.matches(&v.param_type()));
        assert!(!DecodedValue::FixedBytes(vec![0xab; 255]).matches(&ParamType::FixedBytes(255)));
        assert!(DecodedValue::FixedBytes(vec![0xab; 32]).matches(&ParamType::FixedBytes(32)));
    }

    #[test]
    fn display_values() {
        let t = DecodedValue::Tuple(vec![
            DecodedValue::uint256(U256::from(7u64)),
            DecodedValue::Bytes(vec![0xbe, 0xef]),
        ]);
        assert_eq!(t.to_string(), "(7, 0xbeef)");
        let i = DecodedValue::Int(I256::try_from(-5i64).unwrap(), 8);
        assert_eq!(i.to_string(), "-5");
    }

    #[test]
    fn decoded_value_serde_roundtrip() {
        let val = DecodedValue::Tuple(vec![
            DecodedValue::Address(Address::repeat_byte(0x11)),
            DecodedValue::uint256(U256::from(1000u64)),
            DecodedValue::String("hi".into()),
        ]);
        let json = serde_json::to_string(&val).unwrap();
        let back: DecodedValue = serde_json::from_str(&json).unwrap();
        assert_eq!(val, back);
    }
}
