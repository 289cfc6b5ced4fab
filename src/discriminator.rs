use solana_program::hash::hash;

use crate::idl::Category;

/// Anchor's `event_cpi` instruction tag: `sha256("anchor:event")[..8]` read as a
/// big-endian u64. On the wire it appears in little-endian order, so the leading
/// bytes of a self-CPI event instruction are the digest prefix reversed.
pub const EVENT_IX_TAG: u64 = 0x1d9a_cb51_2ea5_45e4;

/// Leading bytes that identify which IDL entry a payload encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminator {
    /// Declared in the IDL; compared over its own length.
    Explicit(Vec<u8>),
    /// Derived from `sha256("<prefix>:<name>")[..8]` for IDLs that declare none.
    Computed([u8; 8]),
}

impl Discriminator {
    pub fn computed(category: Category, name: &str) -> Self {
        let name = match category {
            Category::Instruction => camel_to_snake_case(name),
            Category::Account | Category::Event => name.to_string(),
        };
        let seeds = format!("{}:{}", category.hash_prefix(), name).into_bytes();
        let mut tag = [0u8; 8];
        tag.copy_from_slice(&hash(&seeds).to_bytes()[..8]);
        Self::Computed(tag)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Discriminator::Explicit(bytes) => bytes,
            Discriminator::Computed(tag) => tag,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Byte-for-byte comparison against the head of `data`; short data never matches.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.get(..self.len()) == Some(self.as_bytes())
    }
}

/// Returns the wrapped event bytes when `data` is an `event_cpi` instruction.
pub fn strip_event_cpi_envelope(data: &[u8]) -> Option<&[u8]> {
    data.strip_prefix(EVENT_IX_TAG.to_le_bytes().as_slice())
}

pub fn camel_to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_uppercase() {
            if !result.is_empty()
                && !result.ends_with('_')
                && chars
                    .peek()
                    .is_some_and(|next| next.is_lowercase() || next.is_ascii_digit())
            {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
