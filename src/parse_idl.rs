use std::{path::Path, str::FromStr};

use serde_json::{Map, Value};

use crate::{
    discriminator::Discriminator,
    error::{Error, Result},
    idl::{Category, Idl, IdlEntry},
    schema::{Field, Primitive, TypeDef, TypeDefBody, TypeRef, Variant, VariantFields},
};

pub fn parse_idl_file(file_path: impl AsRef<Path>) -> Result<Idl> {
    parse_idl(&std::fs::read_to_string(file_path)?)
}

pub fn parse_idl(json_str: &str) -> Result<Idl> {
    let json: Value = serde_json::from_str(json_str)?;
    parse_idl_value(&json)
}

/// Builds the schema store from an already-parsed IDL document. Both the legacy
/// (pre-0.30) layout and the 0.30+ layout with explicit discriminators are accepted.
pub fn parse_idl_value(json: &Value) -> Result<Idl> {
    let root = json
        .as_object()
        .ok_or_else(|| Error::schema("Root is not an object"))?;

    let program_name = root
        .get("name")
        .or_else(|| root.get("metadata").and_then(|m| m.get("name")))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let mut types = parse_types(root)?;
    merge_inline_account_types(root, &mut types)?;

    Ok(Idl {
        program_name,
        instructions: parse_entries(root, Category::Instruction)?,
        accounts: parse_entries(root, Category::Account)?,
        events: parse_entries(root, Category::Event)?,
        types,
    })
}

fn parse_types(root: &Map<String, Value>) -> Result<Vec<TypeDef>> {
    let Some(raw_types) = root.get("types") else {
        return Ok(vec![]);
    };
    raw_types
        .as_array()
        .ok_or_else(|| Error::schema("Types is not an array"))?
        .iter()
        .map(parse_type_def)
        .collect()
}

/// Legacy IDLs declare account layouts inline; make them reachable through
/// `defined` references unless a proper type definition already exists.
fn merge_inline_account_types(root: &Map<String, Value>, types: &mut Vec<TypeDef>) -> Result<()> {
    let Some(accounts) = root.get("accounts").and_then(|v| v.as_array()) else {
        return Ok(());
    };
    for raw_account in accounts {
        if raw_account.get("type").is_none() {
            continue;
        }
        let def = parse_type_def(raw_account)?;
        let name = def.name.to_lowercase();
        if !types.iter().any(|t| t.name.to_lowercase() == name) {
            types.push(def);
        }
    }
    Ok(())
}

fn parse_type_def(raw_type: &Value) -> Result<TypeDef> {
    let type_map = raw_type
        .as_object()
        .ok_or_else(|| Error::schema("Type map is not an object"))?;
    let type_name = type_map
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::schema("Type name is not a string"))?;
    let typ = type_map
        .get("type")
        .and_then(|v| v.as_object())
        .ok_or_else(|| Error::schema(format!("Type for {type_name} is not an object")))?;
    let kind = typ
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::schema(format!("Kind for {type_name} is not a string")))?;

    let body = match kind {
        "struct" => TypeDefBody::Struct(parse_optional_fields(typ.get("fields"), type_name)?),
        "enum" => {
            let variants = typ
                .get("variants")
                .and_then(|v| v.as_array())
                .ok_or_else(|| Error::schema(format!("Variants for {type_name} is not an array")))?;
            TypeDefBody::Enum(variants.iter().map(parse_variant).collect::<Result<_>>()?)
        }
        other => TypeDefBody::Unsupported(other.to_string()),
    };
    Ok(TypeDef {
        name: type_name.to_string(),
        body,
    })
}

fn parse_variant(raw_variant: &Value) -> Result<Variant> {
    let variant = raw_variant
        .as_object()
        .ok_or_else(|| Error::schema("Variant is not an object"))?;
    let variant_name = variant
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::schema("Variant name is not a string"))?;
    let fields = match variant.get("fields") {
        None | Some(Value::Null) => VariantFields::Unit,
        Some(fields) => {
            let fields = fields.as_array().ok_or_else(|| {
                Error::schema(format!("Fields for variant {variant_name} is not an array"))
            })?;
            // the first entry decides whether the variant is a tuple or carries named fields
            match fields.first() {
                None => VariantFields::Unit,
                Some(first) if first.get("name").is_none() => VariantFields::Tuple(
                    fields.iter().map(parse_type_ref).collect::<Result<_>>()?,
                ),
                Some(_) => VariantFields::Named(parse_fields(fields)?),
            }
        }
    };
    Ok(Variant {
        name: variant_name.to_string(),
        fields,
    })
}

fn parse_entries(root: &Map<String, Value>, category: Category) -> Result<Option<Vec<IdlEntry>>> {
    let Some(raw_entries) = root.get(category.section()) else {
        return Ok(None);
    };
    let entries: Vec<IdlEntry> = raw_entries
        .as_array()
        .ok_or_else(|| Error::schema(format!("{} is not an array", category.section())))?
        .iter()
        .map(|raw_entry| parse_entry(raw_entry, category))
        .collect::<Result<_>>()?;
    Ok(Some(entries))
}

fn parse_entry(raw_entry: &Value, category: Category) -> Result<IdlEntry> {
    let entry = raw_entry
        .as_object()
        .ok_or_else(|| Error::schema(format!("{category} map is not an object")))?;
    let name = entry
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::schema(format!("{category} name is not a string")))?;

    let discriminator = match entry
        .get("discriminator")
        .or_else(|| entry.get("discriminant"))
    {
        Some(disc) => parse_explicit_discriminator(disc)?,
        None => Discriminator::computed(category, name),
    };

    let raw_fields = match category {
        Category::Instruction => entry.get("args"),
        Category::Event => entry.get("fields"),
        Category::Account => entry
            .get("type")
            .and_then(|t| t.get("fields"))
            .or_else(|| entry.get("fields")),
    };
    let fields = raw_fields
        .map(|fields| {
            let fields = fields
                .as_array()
                .ok_or_else(|| Error::schema(format!("Fields for {name} is not an array")))?;
            parse_fields(fields)
        })
        .transpose()?;

    Ok(IdlEntry {
        name: name.to_string(),
        discriminator,
        fields,
    })
}

/// Accepts a byte array (`[u8; N]`) or the legacy `{ "type": "u8"|"u64", "value": n }`
/// object, which is laid out little-endian.
fn parse_explicit_discriminator(v: &Value) -> Result<Discriminator> {
    if let Some(arr) = v.as_array() {
        let bytes = arr
            .iter()
            .map(|b| {
                b.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| Error::schema("Discriminator byte is not a u8"))
            })
            .collect::<Result<_>>()?;
        return Ok(Discriminator::Explicit(bytes));
    }

    if let Some(obj) = v.as_object() {
        let typ = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::schema("Discriminant type is not a string"))?;
        let value = obj
            .get("value")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::schema("Discriminant value is not a u64"))?;
        let bytes = match typ {
            "u8" => vec![u8::try_from(value)
                .map_err(|_| Error::schema("Discriminant value does not fit a u8"))?],
            "u64" => value.to_le_bytes().to_vec(),
            other => return Err(Error::schema(format!("Unknown discriminant type: {other}"))),
        };
        return Ok(Discriminator::Explicit(bytes));
    }

    Err(Error::schema(
        "Unsupported discriminator value; expected object or byte array",
    ))
}

fn parse_optional_fields(raw_fields: Option<&Value>, type_name: &str) -> Result<Vec<Field>> {
    match raw_fields {
        None | Some(Value::Null) => Ok(vec![]),
        Some(fields) => parse_fields(
            fields
                .as_array()
                .ok_or_else(|| Error::schema(format!("Fields for {type_name} is not an array")))?,
        ),
    }
}

fn parse_fields(fields: &[Value]) -> Result<Vec<Field>> {
    fields.iter().map(parse_field).collect()
}

fn parse_field(raw_field: &Value) -> Result<Field> {
    let Some(field) = raw_field.as_object().filter(|f| f.contains_key("type")) else {
        return Ok(Field::unnamed(parse_type_ref(raw_field)?));
    };
    let field_type = field
        .get("type")
        .ok_or_else(|| Error::schema("Field type not found"))?;
    Ok(Field {
        name: field
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        typ: parse_type_ref(field_type)?,
    })
}

pub(crate) fn parse_type_ref(field_type: &Value) -> Result<TypeRef> {
    let Some(field_type_object) = field_type.as_object() else {
        let field_type_name = field_type
            .as_str()
            .ok_or_else(|| Error::schema("Field type is not a string"))?;
        return parse_raw_type_ref(field_type_name);
    };

    let (key, value) = field_type_object
        .iter()
        .next()
        .ok_or_else(|| Error::schema("Field type object is empty"))?;
    let typ = match key.as_str() {
        "vec" => TypeRef::vec(parse_type_ref(value)?),
        "option" => TypeRef::option(parse_type_ref(value)?),
        "array" => {
            let inner_array = value
                .as_array()
                .ok_or_else(|| Error::schema("Array is not an array"))?;
            let elem = inner_array
                .first()
                .ok_or_else(|| Error::schema("Array value not found"))?;
            TypeRef::array(array_len(inner_array.get(1)), parse_type_ref(elem)?)
        }
        "defined" => {
            let name = value
                .as_str()
                .or_else(|| value.get("name").and_then(|v| v.as_str()))
                .ok_or_else(|| Error::schema("Defined type is not a string"))?;
            TypeRef::defined(name)
        }
        other => TypeRef::Unknown(other.to_string()),
    };
    Ok(typ)
}

/// Integer or float lengths are accepted; anything non-positive or unreadable is 0.
fn array_len(raw_len: Option<&Value>) -> usize {
    match raw_len {
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .or_else(|| v.as_f64().filter(|f| *f >= 1.0).map(|f| f as usize))
            .unwrap_or(0),
        None => 0,
    }
}

fn parse_raw_type_ref(name: &str) -> Result<TypeRef> {
    // bracket-array shorthand like "[u8; 3]" or "[publicKey; 2]"
    if let Some(inner) = name.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let mut parts = inner.split(';');
        let ty_s = parts
            .next()
            .ok_or_else(|| Error::schema("Array missing element type"))?
            .trim();
        let len_s = parts
            .next()
            .ok_or_else(|| Error::schema("Array missing length"))?
            .trim();
        if parts.next().is_some() {
            return Err(Error::schema("Array syntax has extra parts"));
        }
        let len = len_s
            .parse::<usize>()
            .map_err(|e| Error::schema(format!("Array length {len_s}: {e}")))?;
        return Ok(TypeRef::array(len, parse_raw_type_ref(ty_s)?));
    }

    Ok(Primitive::from_str(name)
        .map(TypeRef::Primitive)
        .unwrap_or_else(|_| TypeRef::Unknown(name.to_string())))
}
