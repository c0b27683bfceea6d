/// Configuration options for the [`Decoder`](crate::Decoder).
///
/// # Examples
///
/// ```rust
/// use jsonshape::{DecoderOptions, UnknownFields};
///
/// let options = DecoderOptions {
///     unknown_fields: UnknownFields::Deny,
///     ..Default::default()
/// };
/// assert_eq!(options.max_depth, 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// What to do with object fields that the destination aggregate does not
    /// declare.
    ///
    /// # Default
    ///
    /// [`UnknownFields::Ignore`]
    pub unknown_fields: UnknownFields,

    /// Maximum nesting of objects and arrays.
    ///
    /// Decoding recurses once per nesting level, so this bounds stack usage
    /// on adversarial input. Unknown fields that are skipped rather than
    /// decoded do not count against it.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFields::default(),
            max_depth: 128,
        }
    }
}

/// Policy for object fields missing from an aggregate's tag table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Skip the field's value without decoding it.
    #[default]
    Ignore,
    /// Fail with [`ErrorKind::UnknownField`](crate::ErrorKind::UnknownField).
    Deny,
}
