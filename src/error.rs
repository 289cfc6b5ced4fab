#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid data length: need at least {needed} bytes, have {actual}")]
    InvalidLength { needed: usize, actual: usize },

    /// Raised by scalar reads. Whether it aborts the decode depends on the
    /// configured [`crate::TruncationPolicy`].
    #[error("insufficient data for {type_name}: need {needed} bytes, have {remaining}")]
    InsufficientData {
        type_name: String,
        needed: usize,
        remaining: usize,
    },

    #[error("{section} not found in IDL")]
    SchemaSectionMissing { section: &'static str },

    #[error("couldn't find type: {name}")]
    TypeNotFound { name: String },

    #[error("type {name} has unsupported kind: {kind}")]
    UnsupportedKind { name: String, kind: String },

    #[error("enum {type_name} has no variant with tag {tag}")]
    UnknownVariant { type_name: String, tag: u8 },

    #[error("can't find {category} matching the data discriminator")]
    NoMatch { category: &'static str },

    #[error("decode failure: {reason}")]
    DecodeFailure { reason: String },

    #[error("schema error: {reason}")]
    Schema { reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }
}
