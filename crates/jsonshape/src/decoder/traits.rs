use crate::{
    decoder::Decoder,
    error::{BoxError, DecodeError, ValueError},
    read::Read,
    shape::Shape,
    tags::FieldDef,
};

/// A value the [`Decoder`] can fill in place.
///
/// Implementations consume exactly the tokens of one JSON value. A `null`
/// leaves the destination untouched.
pub trait Decode {
    /// Structural kind reported in shape mismatch errors.
    const SHAPE: Shape;

    /// # Errors
    ///
    /// Returns the first error met while reading the value.
    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError>;

    /// Checks the decoded value. Runs right after [`decode`](Decode::decode)
    /// whenever the value is decoded through [`Decoder::decode`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when the value is not acceptable.
    fn is_valid(&self) -> Result<(), ValueError> {
        Ok(())
    }
}

/// A struct of named fields, decoded from a JSON object.
///
/// Usually generated with [`aggregate!`](crate::aggregate). Its
/// [`Decode`] impl delegates to [`Decoder::decode_aggregate`].
pub trait Aggregate: 'static {
    /// One entry per field, in declaration order.
    const FIELDS: &'static [FieldDef];

    /// When `true` the decoder skips the structural walk and passes the raw
    /// bytes of the value to [`decode_raw`](Aggregate::decode_raw).
    const CUSTOM_DECODE: bool = false;

    /// When `true` [`validate`](Aggregate::validate) runs after all fields
    /// have been decoded and the required fields checked.
    const VALIDATES: bool = false;

    /// Decodes the field at `index` of [`FIELDS`](Aggregate::FIELDS).
    ///
    /// # Errors
    ///
    /// Returns the field's decode or validation error.
    fn decode_field<'src, R: Read<'src>>(
        &mut self,
        index: usize,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError>;

    /// # Errors
    ///
    /// Returns whatever the custom decoder reports.
    fn decode_raw(&mut self, raw: &[u8]) -> Result<(), BoxError> {
        let _ = raw;
        Err("aggregate does not decode raw values".into())
    }

    /// # Errors
    ///
    /// Returns a [`ValueError`] when the aggregate as a whole is invalid.
    fn validate(&self) -> Result<(), ValueError> {
        Ok(())
    }
}

/// A value that parses the raw bytes of its JSON value itself.
///
/// Route the type's [`Decode`] impl through [`Decoder::decode_raw`]:
///
/// ```rust
/// use jsonshape::{BoxError, Decode, DecodeError, Decoder, RawDecode, Read, Shape};
///
/// #[derive(Default)]
/// struct Quoted(i64);
///
/// impl RawDecode for Quoted {
///     fn decode_raw(&mut self, raw: &[u8]) -> Result<(), BoxError> {
///         let text = std::str::from_utf8(raw)?.trim_matches('"');
///         self.0 = text.parse()?;
///         Ok(())
///     }
/// }
///
/// impl Decode for Quoted {
///     const SHAPE: Shape = Shape::Dynamic;
///
///     fn decode<'src, R: Read<'src>>(&mut self, de: &mut Decoder<'src, R>) -> Result<(), DecodeError> {
///         de.decode_raw(self)
///     }
/// }
///
/// let value: Quoted = jsonshape::from_str(r#""123""#).unwrap();
/// assert_eq!(value.0, 123);
/// ```
pub trait RawDecode {
    /// Parses `raw`, the exact bytes of the value including string quotes.
    ///
    /// # Errors
    ///
    /// Returns any error; it is reported as a custom decode failure.
    fn decode_raw(&mut self, raw: &[u8]) -> Result<(), BoxError>;
}
