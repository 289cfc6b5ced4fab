use super::{Decoded, Decoder};
use crate::{
    error::{Error, Result},
    schema::{Field, Primitive, Variant, VariantFields},
    value::{DecodedValue, ValueNode},
};

impl Decoder<'_> {
    /// Fields in declaration order, each starting where the previous one ended.
    pub fn decode_struct(
        &self,
        data: &[u8],
        offset: usize,
        fields: &[Field],
        depth: usize,
    ) -> Result<Decoded> {
        let mut nodes = Vec::with_capacity(fields.len());
        let mut consumed = 0usize;
        for (index, field) in fields.iter().enumerate() {
            let (value, n) =
                self.resolve(data, offset.saturating_add(consumed), &field.typ, depth + 1)?;
            nodes.push(ValueNode::new(field.output_name(index), value));
            consumed = consumed.saturating_add(n);
        }
        Ok((DecodedValue::Struct(nodes), consumed))
    }

    /// One tag byte selects the variant by position; its fields follow.
    pub fn decode_enum(
        &self,
        data: &[u8],
        offset: usize,
        type_name: &str,
        variants: &[Variant],
        depth: usize,
    ) -> Result<Decoded> {
        let (tag, mut consumed) = match self.decode_primitive(data, offset, Primitive::U8)? {
            (DecodedValue::U8(tag), n) => (tag, n),
            // truncated under the tolerant policy
            (value, n) => return Ok((value, n)),
        };
        let variant = variants
            .get(usize::from(tag))
            .ok_or_else(|| Error::UnknownVariant {
                type_name: type_name.to_string(),
                tag,
            })?;

        let payload = match &variant.fields {
            VariantFields::Unit => DecodedValue::Struct(vec![]),
            VariantFields::Tuple(types) => {
                let mut values = Vec::with_capacity(types.len());
                for typ in types {
                    let (value, n) =
                        self.resolve(data, offset.saturating_add(consumed), typ, depth + 1)?;
                    values.push(value);
                    consumed = consumed.saturating_add(n);
                }
                DecodedValue::Tuple(values)
            }
            VariantFields::Named(fields) => {
                let (value, n) =
                    self.decode_struct(data, offset.saturating_add(consumed), fields, depth)?;
                consumed = consumed.saturating_add(n);
                value
            }
        };
        Ok((DecodedValue::new_enum(&variant.name, payload), consumed))
    }
}
