use serde::Serialize;

use crate::{
    discriminator::Discriminator,
    error::{Error, Result},
    schema::{Field, TypeDef},
};

/// The three payload families an IDL describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Instruction,
    Account,
    Event,
}

impl Category {
    /// Top-level IDL key holding this category's entries.
    pub fn section(self) -> &'static str {
        match self {
            Category::Instruction => "instructions",
            Category::Account => "accounts",
            Category::Event => "events",
        }
    }

    /// Namespace used when hashing a computed discriminator.
    pub fn hash_prefix(self) -> &'static str {
        match self {
            Category::Instruction => "global",
            Category::Account => "account",
            Category::Event => "event",
        }
    }
}

/// An instruction, account or event declared by the IDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdlEntry {
    pub name: String,
    pub discriminator: Discriminator,
    /// `None` when the layout lives in a same-named entry of `types`.
    pub fields: Option<Vec<Field>>,
}

/// Read-only view over a parsed IDL. Built once, shared freely between decode calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Idl {
    pub program_name: String,
    pub instructions: Option<Vec<IdlEntry>>,
    pub accounts: Option<Vec<IdlEntry>>,
    pub events: Option<Vec<IdlEntry>>,
    pub types: Vec<TypeDef>,
}

impl Idl {
    pub fn entries(&self, category: Category) -> Result<&[IdlEntry]> {
        let section = match category {
            Category::Instruction => &self.instructions,
            Category::Account => &self.accounts,
            Category::Event => &self.events,
        };
        section
            .as_deref()
            .ok_or(Error::SchemaSectionMissing {
                section: category.section(),
            })
    }

    /// Case-insensitive lookup into `types` (Unicode lowercase folding); the
    /// first declaration wins.
    pub fn find_type(&self, name: &str) -> Option<&TypeDef> {
        let wanted = name.to_lowercase();
        self.types
            .iter()
            .find(|def| def.name.to_lowercase() == wanted)
    }
}
