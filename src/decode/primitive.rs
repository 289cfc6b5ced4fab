use borsh::BorshDeserialize;
use solana_program::pubkey::Pubkey;

use crate::{
    error::{Error, Result},
    schema::Primitive,
    value::DecodedValue,
};

/// Decodes one scalar at `offset`, returning the value and the bytes consumed.
///
/// Multi-byte values are little-endian. `bool` only looks at the low bit.
/// `string` is a u32 length prefix followed by UTF-8 (invalid sequences are
/// replaced rather than rejected). `bytes` needs the container path and is
/// rejected here; route it through [`crate::decode::Decoder`] instead.
pub fn decode_primitive(
    data: &[u8],
    offset: usize,
    primitive: Primitive,
) -> Result<(DecodedValue, usize)> {
    let Some(width) = primitive.width() else {
        return match primitive {
            Primitive::String => decode_string(data, offset),
            _ => Err(Error::DecodeFailure {
                reason: format!("{primitive} is not a scalar"),
            }),
        };
    };
    let bytes = take(data, offset, width, primitive.as_ref())?;
    let value = match primitive {
        Primitive::U8 => DecodedValue::U8(u8::try_from_slice(bytes)?),
        Primitive::U16 => DecodedValue::U16(u16::try_from_slice(bytes)?),
        Primitive::U32 => DecodedValue::U32(u32::try_from_slice(bytes)?),
        Primitive::U64 => DecodedValue::U64(u64::try_from_slice(bytes)?),
        Primitive::U128 => DecodedValue::U128(u128::try_from_slice(bytes)?),
        Primitive::I8 => DecodedValue::I8(i8::try_from_slice(bytes)?),
        Primitive::I16 => DecodedValue::I16(i16::try_from_slice(bytes)?),
        Primitive::I32 => DecodedValue::I32(i32::try_from_slice(bytes)?),
        Primitive::I64 => DecodedValue::I64(i64::try_from_slice(bytes)?),
        Primitive::I128 => DecodedValue::I128(i128::try_from_slice(bytes)?),
        // borsh refuses NaN, the raw bit pattern is wanted here
        Primitive::F32 => DecodedValue::F32(f32::from_bits(u32::try_from_slice(bytes)?)),
        Primitive::F64 => DecodedValue::F64(f64::from_bits(u64::try_from_slice(bytes)?)),
        Primitive::Bool => DecodedValue::Bool(bytes.first().is_some_and(|b| b & 1 == 1)),
        Primitive::Pubkey => {
            let key: [u8; 32] = bytes.try_into().map_err(|_| Error::DecodeFailure {
                reason: "pubkey is not 32 bytes".into(),
            })?;
            DecodedValue::Pubkey(Pubkey::new_from_array(key).to_string())
        }
        Primitive::String | Primitive::Bytes => {
            return Err(Error::DecodeFailure {
                reason: format!("{primitive} is not a scalar"),
            })
        }
    };
    Ok((value, width))
}

/// Reads the u32 element count that prefixes strings and vectors.
pub(crate) fn read_len(data: &[u8], offset: usize, type_name: &str) -> Result<usize> {
    let bytes = take(data, offset, 4, type_name)?;
    Ok(u32::try_from_slice(bytes)? as usize)
}

fn decode_string(data: &[u8], offset: usize) -> Result<(DecodedValue, usize)> {
    let len = read_len(data, offset, "string")?;
    let body = take(data, offset.saturating_add(4), len, "string").map_err(|_| {
        Error::InsufficientData {
            type_name: "string".into(),
            needed: 4 + len,
            remaining: remaining(data, offset),
        }
    })?;
    Ok((
        DecodedValue::String(String::from_utf8_lossy(body).into_owned()),
        4 + len,
    ))
}

fn take<'d>(data: &'d [u8], offset: usize, width: usize, type_name: &str) -> Result<&'d [u8]> {
    data.get(offset..)
        .and_then(|rest| rest.get(..width))
        .ok_or_else(|| Error::InsufficientData {
            type_name: type_name.to_string(),
            needed: width,
            remaining: remaining(data, offset),
        })
}

pub(crate) fn remaining(data: &[u8], offset: usize) -> usize {
    data.len().saturating_sub(offset)
}
