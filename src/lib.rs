#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

//! Decodes Anchor instruction data, account state and emitted events using only
//! the program's JSON IDL.

pub mod decode;
pub mod discriminator;
pub mod dispatch;
pub mod error;
pub mod idl;
pub mod options;
pub mod parse_idl;
pub mod schema;
pub mod value;

pub use decode::{Decoded, Decoder};
pub use discriminator::{Discriminator, EVENT_IX_TAG};
pub use dispatch::ParsedPayload;
pub use error::{Error, Result};
pub use idl::{Category, Idl, IdlEntry};
pub use options::{DecoderOptions, TruncationPolicy, DEFAULT_MAX_DEPTH};
pub use parse_idl::{parse_idl, parse_idl_file, parse_idl_value};
pub use schema::{Field, Primitive, TypeDef, TypeDefBody, TypeRef, Variant, VariantFields};
pub use value::{DecodedValue, ValueNode};
