use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use crate::{
    decode::Decoder,
    discriminator::strip_event_cpi_envelope,
    error::{Error, Result},
    idl::{Category, Idl, IdlEntry},
    options::DecoderOptions,
    schema::TypeRef,
    value::DecodedValue,
};

const PROGRAM_LOG: &str = "Program log: ";
const PROGRAM_DATA: &str = "Program data: ";

/// A payload matched against the IDL and decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub discriminator: Vec<u8>,
    pub data: DecodedValue,
}

impl Idl {
    pub fn decode_instruction(&self, data: &[u8]) -> Result<ParsedPayload> {
        self.decode_instruction_with(data, DecoderOptions::default())
    }

    /// Instruction data, or an `event_cpi` self-invocation, in which case the
    /// wrapped event is decoded instead.
    pub fn decode_instruction_with(
        &self,
        data: &[u8],
        options: DecoderOptions,
    ) -> Result<ParsedPayload> {
        if let Some(event_data) = strip_event_cpi_envelope(data) {
            tracing::debug!(len = event_data.len(), "unwrapping CPI event envelope");
            return self.decode_event_with(event_data, options);
        }
        self.dispatch(Category::Instruction, data, options)
    }

    pub fn decode_account(&self, data: &[u8]) -> Result<ParsedPayload> {
        self.decode_account_with(data, DecoderOptions::default())
    }

    pub fn decode_account_with(
        &self,
        data: &[u8],
        options: DecoderOptions,
    ) -> Result<ParsedPayload> {
        self.dispatch(Category::Account, data, options)
    }

    /// Raw event bytes, discriminator included.
    pub fn decode_event(&self, data: &[u8]) -> Result<ParsedPayload> {
        self.decode_event_with(data, DecoderOptions::default())
    }

    pub fn decode_event_with(
        &self,
        data: &[u8],
        options: DecoderOptions,
    ) -> Result<ParsedPayload> {
        self.dispatch(Category::Event, data, options)
    }

    /// A `Program log: <base64>` or `Program data: <base64>` line from transaction logs.
    pub fn decode_event_log(&self, line: &str) -> Result<ParsedPayload> {
        self.decode_event_log_with(line, DecoderOptions::default())
    }

    pub fn decode_event_log_with(
        &self,
        line: &str,
        options: DecoderOptions,
    ) -> Result<ParsedPayload> {
        let encoded = line
            .strip_prefix(PROGRAM_LOG)
            .or_else(|| line.strip_prefix(PROGRAM_DATA))
            .ok_or_else(|| Error::DecodeFailure {
                reason: "log does not start with a valid prefix".into(),
            })?;
        let data = STANDARD.decode(encoded).map_err(|e| Error::DecodeFailure {
            reason: format!("failed to decode base64 log string: {e}"),
        })?;
        self.decode_event_with(&data, options)
    }

    fn dispatch(
        &self,
        category: Category,
        data: &[u8],
        options: DecoderOptions,
    ) -> Result<ParsedPayload> {
        let entry = find_entry(self.entries(category)?, category, data)?;
        let disc_len = entry.discriminator.len();
        tracing::debug!(%category, name = %entry.name, disc_len, "discriminator matched");

        let decoder = Decoder::new(self, options);
        let (value, _) = match &entry.fields {
            Some(fields) => decoder.decode_struct(data, disc_len, fields, 0)?,
            None => decoder.resolve(data, disc_len, &TypeRef::defined(entry.name.as_str()), 0)?,
        };

        Ok(ParsedPayload {
            name: entry.name.clone(),
            category,
            discriminator: entry.discriminator.as_bytes().to_vec(),
            data: value,
        })
    }
}

/// First entry, in declaration order, whose discriminator prefixes `data`.
fn find_entry<'i>(
    entries: &'i [IdlEntry],
    category: Category,
    data: &[u8],
) -> Result<&'i IdlEntry> {
    if let Some(entry) = entries.iter().find(|entry| entry.discriminator.matches(data)) {
        return Ok(entry);
    }
    match entries.iter().map(|entry| entry.discriminator.len()).min() {
        Some(needed) if data.len() < needed => Err(Error::InvalidLength {
            needed,
            actual: data.len(),
        }),
        _ => Err(Error::NoMatch {
            category: category.section(),
        }),
    }
}
