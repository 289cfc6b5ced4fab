use std::fmt;

/// Scalar types understood by the decoder, named as they appear in an IDL.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    F32,
    F64,
    Bool,
    #[strum(to_string = "pubkey", serialize = "publicKey")]
    Pubkey,
    String,
    /// Borsh `Vec<u8>`; decoded through the vector path.
    Bytes,
}

impl Primitive {
    /// Wire width in bytes, `None` for length-prefixed types.
    pub fn width(self) -> Option<usize> {
        match self {
            Primitive::U8 | Primitive::I8 | Primitive::Bool => Some(1),
            Primitive::U16 | Primitive::I16 => Some(2),
            Primitive::U32 | Primitive::I32 | Primitive::F32 => Some(4),
            Primitive::U64 | Primitive::I64 | Primitive::F64 => Some(8),
            Primitive::U128 | Primitive::I128 => Some(16),
            Primitive::Pubkey => Some(32),
            Primitive::String | Primitive::Bytes => None,
        }
    }
}

/// A reference to a type from a field, variant or container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(Primitive),
    Vec(Box<TypeRef>),
    /// Fixed length taken from the schema, no length prefix on the wire.
    Array(usize, Box<TypeRef>),
    Option(Box<TypeRef>),
    /// Named reference into the IDL `types` section.
    Defined(String),
    /// A type with no known wire layout (`coption`, `u256`, generics). Loading
    /// accepts it; decoding fails only when a payload reaches it.
    Unknown(String),
}

impl TypeRef {
    pub fn vec(typ: TypeRef) -> Self {
        Self::Vec(Box::new(typ))
    }

    pub fn array(len: usize, typ: TypeRef) -> Self {
        Self::Array(len, Box::new(typ))
    }

    pub fn option(typ: TypeRef) -> Self {
        Self::Option(Box::new(typ))
    }

    pub fn defined(name: impl Into<String>) -> Self {
        Self::Defined(name.into())
    }
}

impl From<Primitive> for TypeRef {
    fn from(value: Primitive) -> Self {
        TypeRef::Primitive(value)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{p}"),
            TypeRef::Vec(inner) => write!(f, "vec<{inner}>"),
            TypeRef::Array(len, inner) => write!(f, "[{inner}; {len}]"),
            TypeRef::Option(inner) => write!(f, "option<{inner}>"),
            TypeRef::Defined(name) | TypeRef::Unknown(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// `None` when the schema entry carries no usable name.
    pub name: Option<String>,
    pub typ: TypeRef,
}

impl Field {
    pub fn new(name: impl Into<String>, typ: impl Into<TypeRef>) -> Self {
        Self {
            name: Some(name.into()),
            typ: typ.into(),
        }
    }

    pub fn unnamed(typ: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            typ: typ.into(),
        }
    }

    /// Name used in decoded output; unnamed fields get a positional placeholder.
    pub fn output_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("field_{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantFields {
    Unit,
    Tuple(Vec<TypeRef>),
    Named(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub fields: VariantFields,
}

impl Variant {
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: VariantFields::Unit,
        }
    }

    pub fn tuple(name: impl Into<String>, types: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            fields: VariantFields::Tuple(types),
        }
    }

    pub fn named(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields: VariantFields::Named(fields),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefBody {
    Struct(Vec<Field>),
    /// Variant index is the wire tag.
    Enum(Vec<Variant>),
    /// Any other `kind`; kept so decoding can report it.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub body: TypeDefBody,
}

impl TypeDef {
    pub fn new_struct(name: impl Into<String>, fields: Vec<(impl Into<String>, TypeRef)>) -> Self {
        Self {
            name: name.into(),
            body: TypeDefBody::Struct(
                fields
                    .into_iter()
                    .map(|(name, typ)| Field::new(name, typ))
                    .collect(),
            ),
        }
    }

    pub fn new_enum(name: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self {
            name: name.into(),
            body: TypeDefBody::Enum(variants),
        }
    }

    pub fn kind(&self) -> &str {
        match &self.body {
            TypeDefBody::Struct(_) => "struct",
            TypeDefBody::Enum(_) => "enum",
            TypeDefBody::Unsupported(kind) => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Field, Primitive, TypeDef, TypeRef};

    #[test]
    fn primitive_names_round_trip_through_strum() {
        assert_eq!(Primitive::from_str("u128").unwrap(), Primitive::U128);
        assert_eq!(Primitive::from_str("publicKey").unwrap(), Primitive::Pubkey);
        assert_eq!(Primitive::from_str("pubkey").unwrap(), Primitive::Pubkey);
        assert_eq!(Primitive::from_str("bytes").unwrap(), Primitive::Bytes);
        assert!(Primitive::from_str("u256").is_err());
        assert_eq!(Primitive::Pubkey.to_string(), "pubkey");
        assert_eq!(Primitive::I64.as_ref(), "i64");
    }

    #[test]
    fn primitive_widths() {
        assert_eq!(Primitive::Bool.width(), Some(1));
        assert_eq!(Primitive::F32.width(), Some(4));
        assert_eq!(Primitive::I128.width(), Some(16));
        assert_eq!(Primitive::Pubkey.width(), Some(32));
        assert_eq!(Primitive::String.width(), None);
    }

    #[test]
    fn type_ref_display() {
        let typ = TypeRef::vec(TypeRef::array(
            3,
            TypeRef::option(TypeRef::defined("MarketSizeParams")),
        ));
        assert_eq!(typ.to_string(), "vec<[option<MarketSizeParams>; 3]>");
    }

    #[test]
    fn unnamed_fields_get_positional_names() {
        assert_eq!(Field::new("bidsSize", Primitive::U64).output_name(0), "bidsSize");
        assert_eq!(Field::unnamed(Primitive::U64).output_name(2), "field_2");
        assert_eq!(Field::new("", Primitive::U8).output_name(1), "field_1");
    }

    #[test]
    fn type_def_kind() {
        let def = TypeDef::new_struct(
            "MarketSizeParams",
            vec![
                ("bidsSize", TypeRef::from(Primitive::U64)),
                ("asksSize", TypeRef::from(Primitive::U64)),
            ],
        );
        assert_eq!(def.kind(), "struct");
        assert_eq!(TypeDef::new_enum("Side", vec![]).kind(), "enum");
    }
}
