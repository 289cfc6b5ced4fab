/// Recursion bound applied when nothing else is configured.
pub const DEFAULT_MAX_DEPTH: usize = 62;

/// What to do when a scalar runs past the end of the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Substitute a null value, report the nominal width and keep going, so a
    /// truncated tail does not cost the fields that were fully present.
    #[default]
    Tolerant,
    /// Abort the whole decode with `InsufficientData`.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub truncation: TruncationPolicy,
    /// Nesting deeper than this yields a null value consuming nothing.
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            truncation: TruncationPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderOptions {
    pub fn strict() -> Self {
        Self {
            truncation: TruncationPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn is_tolerant(&self) -> bool {
        self.truncation == TruncationPolicy::Tolerant
    }
}
