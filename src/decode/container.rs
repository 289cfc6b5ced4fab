use super::{primitive, Decoded, Decoder};
use crate::{
    error::{Error, Result},
    schema::TypeRef,
    value::DecodedValue,
};

/// Upper bound on elements that occupy no bytes, since the buffer can't bound them.
const MAX_ZERO_WIDTH_ELEMENTS: usize = 1 << 16;

impl Decoder<'_> {
    /// `u32` element count, then that many elements. The prefix counts toward
    /// the bytes consumed.
    pub fn decode_vector(
        &self,
        data: &[u8],
        offset: usize,
        elem: &TypeRef,
        depth: usize,
    ) -> Result<Decoded> {
        let type_name = format!("vec<{elem}>");
        let count = match primitive::read_len(data, offset, &type_name) {
            Ok(count) => count,
            Err(Error::InsufficientData { .. }) if self.options.is_tolerant() => {
                tracing::debug!(%type_name, offset, "truncated vector length");
                return Ok((DecodedValue::Vec(vec![]), 4));
            }
            Err(e) => return Err(e),
        };

        let body = offset.saturating_add(4);
        let (values, consumed) = self.decode_sequence(data, body, elem, count, depth)?;
        Ok((DecodedValue::Vec(values), consumed.saturating_add(4)))
    }

    /// Exactly `len` elements with no prefix; `len` comes from the schema.
    pub fn decode_array(
        &self,
        data: &[u8],
        offset: usize,
        elem: &TypeRef,
        len: usize,
        depth: usize,
    ) -> Result<Decoded> {
        let (values, consumed) = self.decode_sequence(data, offset, elem, len, depth)?;
        Ok((DecodedValue::Array(values), consumed))
    }

    /// Sized elements are bounded by the buffer: strict decoding fails on the
    /// first one past the end and tolerant decoding stops there.
    fn decode_sequence(
        &self,
        data: &[u8],
        offset: usize,
        elem: &TypeRef,
        count: usize,
        depth: usize,
    ) -> Result<(Vec<DecodedValue>, usize)> {
        let mut values = Vec::with_capacity(count.min(data.len()));
        let mut consumed = 0usize;
        while values.len() < count {
            let cursor = offset.saturating_add(consumed);
            let (value, n) = self.resolve(data, cursor, elem, depth + 1)?;
            if n == 0 {
                // the next element would start at the same cursor and decode identically
                self.repeat_zero_width(&mut values, value, elem, count)?;
                break;
            }
            if cursor >= data.len() {
                tracing::debug!(
                    %elem,
                    decoded = values.len(),
                    count,
                    "sequence truncated at end of data"
                );
                break;
            }
            values.push(value);
            consumed = consumed.saturating_add(n);
        }
        Ok((values, consumed))
    }

    fn repeat_zero_width(
        &self,
        values: &mut Vec<DecodedValue>,
        value: DecodedValue,
        elem: &TypeRef,
        count: usize,
    ) -> Result<()> {
        let limit = values.len().saturating_add(MAX_ZERO_WIDTH_ELEMENTS);
        if count > limit {
            if !self.options.is_tolerant() {
                return Err(Error::DecodeFailure {
                    reason: format!("{count} zero-width {elem} elements exceed the limit"),
                });
            }
            tracing::debug!(%elem, count, limit, "zero-width sequence capped");
        }
        values.resize(count.min(limit), value);
        Ok(())
    }
}
