mod composite;
mod container;
pub mod primitive;

use crate::{
    error::{Error, Result},
    idl::Idl,
    options::DecoderOptions,
    schema::{Primitive, TypeDefBody, TypeRef},
    value::DecodedValue,
};

/// A decoded value and the number of bytes it occupied on the wire.
pub type Decoded = (DecodedValue, usize);

const BYTE: TypeRef = TypeRef::Primitive(Primitive::U8);

/// Schema-driven Borsh decoder.
///
/// Every method takes the whole buffer plus an offset and reports how many bytes
/// it consumed, so callers advance their cursor by exactly that amount. Reads are
/// bounds-checked; running off the end is `InsufficientData`, which the
/// [`crate::TruncationPolicy`] turns into either a null value or an error.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    idl: &'a Idl,
    options: DecoderOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(idl: &'a Idl, options: DecoderOptions) -> Self {
        Self { idl, options }
    }

    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Routes a type reference to the matching decoder.
    pub fn resolve(
        &self,
        data: &[u8],
        offset: usize,
        typ: &TypeRef,
        depth: usize,
    ) -> Result<Decoded> {
        if depth > self.options.max_depth {
            tracing::trace!(depth, %typ, "recursion depth cap reached");
            return Ok((DecodedValue::Null, 0));
        }
        match typ {
            TypeRef::Primitive(Primitive::Bytes) => self.decode_vector(data, offset, &BYTE, depth),
            TypeRef::Primitive(primitive) => self.decode_primitive(data, offset, *primitive),
            TypeRef::Vec(elem) => self.decode_vector(data, offset, elem, depth),
            TypeRef::Array(len, elem) => self.decode_array(data, offset, elem, *len, depth),
            // TODO: Borsh writes a one-byte presence flag before the value; confirm
            // against captured payloads before consuming it here.
            TypeRef::Option(inner) => self.resolve(data, offset, inner, depth + 1),
            TypeRef::Defined(name) => self.decode_defined(data, offset, name, depth),
            TypeRef::Unknown(name) => self.decode_unknown(offset, name),
        }
    }

    pub fn decode_primitive(
        &self,
        data: &[u8],
        offset: usize,
        primitive: Primitive,
    ) -> Result<Decoded> {
        match primitive::decode_primitive(data, offset, primitive) {
            Err(Error::InsufficientData {
                type_name,
                needed,
                remaining,
            }) if self.options.is_tolerant() => {
                tracing::debug!(
                    %type_name,
                    offset,
                    needed,
                    remaining,
                    "truncated value decoded as null"
                );
                Ok((DecodedValue::Null, needed))
            }
            decoded => decoded,
        }
    }

    fn decode_defined(
        &self,
        data: &[u8],
        offset: usize,
        name: &str,
        depth: usize,
    ) -> Result<Decoded> {
        let def = self.idl.find_type(name).ok_or_else(|| Error::TypeNotFound {
            name: name.to_string(),
        })?;
        match &def.body {
            TypeDefBody::Struct(fields) => self.decode_struct(data, offset, fields, depth + 1),
            TypeDefBody::Enum(variants) => {
                self.decode_enum(data, offset, &def.name, variants, depth + 1)
            }
            TypeDefBody::Unsupported(kind) => Err(Error::UnsupportedKind {
                name: def.name.clone(),
                kind: kind.clone(),
            }),
        }
    }

    /// No layout to follow: tolerant decoding yields null without consuming input.
    fn decode_unknown(&self, offset: usize, name: &str) -> Result<Decoded> {
        if self.options.is_tolerant() {
            tracing::debug!(%name, offset, "no layout for type, decoded as null");
            return Ok((DecodedValue::Null, 0));
        }
        Err(Error::DecodeFailure {
            reason: format!("no layout for type {name}"),
        })
    }
}
