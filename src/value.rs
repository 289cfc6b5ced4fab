use serde::{ser::SerializeMap, Serialize, Serializer};
use solana_program::pubkey::Pubkey;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueNode {
    pub name: String,
    pub value: DecodedValue,
}

impl ValueNode {
    pub fn new(name: impl Into<String>, value: DecodedValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    /// Nothing could be read: truncated input or the recursion cap.
    Null,
    Pubkey(String),
    String(String),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
    Bool(bool),
    /// the length is enforced by the schema
    Array(Vec<DecodedValue>),
    /// unnamed enum variant fields, the inner types can differ
    Tuple(Vec<DecodedValue>),
    /// the inner value is the selected variant, its payload a Struct, Tuple or empty Struct
    Enum(Box<ValueNode>),
    /// length-prefixed on the wire
    Vec(Vec<DecodedValue>),
    /// fields in declaration order
    Struct(Vec<ValueNode>),
}

impl DecodedValue {
    pub fn new_struct(fields: Vec<(impl Into<String>, DecodedValue)>) -> Self {
        let nodes = fields
            .into_iter()
            .map(|(name, value)| ValueNode::new(name.into(), value))
            .collect();
        Self::Struct(nodes)
    }

    pub fn new_enum(variant: impl Into<String>, payload: DecodedValue) -> Self {
        Self::Enum(Box::new(ValueNode::new(variant, payload)))
    }

    /// Looks up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&DecodedValue> {
        match self {
            DecodedValue::Struct(fields) => fields
                .iter()
                .find(|field| field.name == name)
                .map(|field| &field.value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DecodedValue::Null)
    }
}

macro_rules! type_conversion {
    ($($t:ty => $v:ident)*) => ($(
        impl From<$t> for DecodedValue {
            fn from(value: $t) -> Self {
                DecodedValue::$v(value)
            }
        }
    )*)
}

type_conversion!(
    String => String
    i8 => I8
    u8 => U8
    i16 => I16
    u16 => U16
    i32 => I32
    u32 => U32
    i64 => I64
    u64 => U64
    i128 => I128
    u128 => U128
    f32 => F32
    f64 => F64
    bool => Bool
);

impl From<&str> for DecodedValue {
    fn from(value: &str) -> Self {
        DecodedValue::String(value.to_string())
    }
}

impl From<Pubkey> for DecodedValue {
    fn from(value: Pubkey) -> Self {
        DecodedValue::Pubkey(value.to_string())
    }
}

impl<T: Into<DecodedValue>> From<Vec<T>> for DecodedValue {
    fn from(value: Vec<T>) -> Self {
        DecodedValue::Vec(value.into_iter().map(|v| v.into()).collect())
    }
}

impl Serialize for DecodedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self {
            DecodedValue::Null => serializer.serialize_none(),
            DecodedValue::Pubkey(v) => v.serialize(serializer),
            DecodedValue::String(v) => v.serialize(serializer),
            DecodedValue::I8(v) => v.serialize(serializer),
            DecodedValue::U8(v) => v.serialize(serializer),
            DecodedValue::I16(v) => v.serialize(serializer),
            DecodedValue::U16(v) => v.serialize(serializer),
            DecodedValue::I32(v) => v.serialize(serializer),
            DecodedValue::U32(v) => v.serialize(serializer),
            DecodedValue::I64(v) => v.to_string().serialize(serializer),
            DecodedValue::U64(v) => v.to_string().serialize(serializer),
            DecodedValue::I128(v) => v.to_string().serialize(serializer),
            DecodedValue::U128(v) => v.to_string().serialize(serializer),
            DecodedValue::F32(v) => v.serialize(serializer),
            DecodedValue::F64(v) => v.serialize(serializer),
            DecodedValue::Bool(v) => v.serialize(serializer),
            DecodedValue::Array(v) => v.serialize(serializer),
            DecodedValue::Tuple(v) => v.serialize(serializer),
            DecodedValue::Enum(v) => {
                let mut state = serializer.serialize_map(Some(1))?;
                state.serialize_entry(&v.name, &v.value)?;
                state.end()
            }
            DecodedValue::Vec(v) => v.serialize(serializer),
            DecodedValue::Struct(v) => {
                let mut state = serializer.serialize_map(Some(v.len()))?;
                for field in v {
                    state.serialize_entry(&field.name, &field.value)?;
                }
                state.end()
            }
        }
    }
}
