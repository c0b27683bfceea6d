//! Values that must be present and non-empty.
//!
//! [`Required<T>`] holds an optional `T`. It decodes like `T`, but its
//! validity check fails when the document holds `null` or a blank value.
//! The check runs only when the field is present: an absent field is never
//! decoded, so it is caught only when the field also carries the `required`
//! annotation modifier.
use core::fmt;

use crate::{
    decoder::{Decode, Decoder},
    error::{DecodeError, ValueError},
    read::Read,
    shape::Shape,
};

/// Values that can be held by a [`Required`].
pub trait Blank {
    /// Name reported in [`ValueError::Empty`].
    const NAME: &'static str;

    /// Whether a present value still counts as empty.
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for String {
    const NAME: &'static str = "required string";

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for bool {
    const NAME: &'static str = "required bool";
}

macro_rules! numbers_are_never_blank {
    ($name:literal: $($t:ty),*) => {
        $(
            impl Blank for $t {
                const NAME: &'static str = $name;
            }
        )*
    };
}
numbers_are_never_blank!("required int": i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numbers_are_never_blank!("required float": f32, f64);

macro_rules! empty_slices_are_blank {
    ($($t:ty => $name:literal),*) => {
        $(
            impl Blank for Vec<$t> {
                const NAME: &'static str = $name;

                fn is_blank(&self) -> bool {
                    self.is_empty()
                }
            }
        )*
    };
}
empty_slices_are_blank!(
    String => "required string slice",
    i64 => "required int slice",
    f64 => "required float slice",
    bool => "required bool slice",
    u8 => "required bytes"
);

/// A value that must not be `null` or blank once present.
///
/// Pair it with the `required` annotation modifier to also reject documents
/// that omit the field.
///
/// # Examples
///
/// ```rust
/// use jsonshape::{ErrorKind, RequiredString};
///
/// let name: RequiredString = jsonshape::from_str(r#""lasse""#).unwrap();
/// assert_eq!(name.get().map(String::as_str), Some("lasse"));
///
/// let err = jsonshape::from_str::<RequiredString>(r#""""#).unwrap_err();
/// assert!(matches!(err.kind(), ErrorKind::ValueInvalid(_)));
/// ```
#[derive(Clone, PartialEq)]
pub struct Required<T> {
    value: Option<T>,
}

/// A string that must not be blank.
pub type RequiredString = Required<String>;
/// An integer that must not be `null`.
pub type RequiredInt = Required<i64>;
/// A float that must not be `null`.
pub type RequiredFloat = Required<f64>;
/// A boolean that must not be `null`.
pub type RequiredBool = Required<bool>;
/// A list of strings that must not be empty.
pub type RequiredStringSlice = Required<Vec<String>>;
/// A list of integers that must not be empty.
pub type RequiredIntSlice = Required<Vec<i64>>;
/// A list of floats that must not be empty.
pub type RequiredFloatSlice = Required<Vec<f64>>;
/// A list of booleans that must not be empty.
pub type RequiredBoolSlice = Required<Vec<bool>>;
/// Bytes, decoded from an array of integers, that must not be empty.
pub type RequiredBytes = Required<Vec<u8>>;

impl<T> Required<T> {
    /// A wrapper that already holds `value`.
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// The held value, `None` until one is decoded.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a value was decoded.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Unwraps the held value.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Required<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> From<T> for Required<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Required<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => f.debug_tuple("Required").field(v).finish(),
            None => f.write_str("Required(<unset>)"),
        }
    }
}

impl<T: Decode + Default + Blank> Decode for Required<T> {
    const SHAPE: Shape = T::SHAPE;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        if de.take_null()? {
            self.value = None;
            return Ok(());
        }
        let mut value = T::default();
        value.decode(de)?;
        self.value = Some(value);
        Ok(())
    }

    fn is_valid(&self) -> Result<(), ValueError> {
        match &self.value {
            Some(v) if !v.is_blank() => Ok(()),
            _ => Err(ValueError::Empty(T::NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{ErrorKind, from_str};

    fn empty_name<T>(input: &str) -> Option<&'static str>
    where
        T: Decode + Default + Blank,
    {
        match from_str::<Required<T>>(input) {
            Ok(_) => None,
            Err(err) => match err.into_kind() {
                ErrorKind::ValueInvalid(ValueError::Empty(name)) => Some(name),
                other => panic!("unexpected error: {other}"),
            },
        }
    }

    #[rstest]
    #[case(r#""x""#, None)]
    #[case(r#""""#, Some("required string"))]
    #[case("null", Some("required string"))]
    fn strings(#[case] input: &str, #[case] expected: Option<&'static str>) {
        assert_eq!(empty_name::<String>(input), expected);
    }

    #[test]
    fn zero_and_false_are_valid_once_present() {
        assert_eq!(empty_name::<i64>("0"), None);
        assert_eq!(empty_name::<f64>("0.0"), None);
        assert_eq!(empty_name::<bool>("false"), None);
        assert_eq!(empty_name::<bool>("null"), Some("required bool"));
    }

    #[test]
    fn empty_slices_are_blank() {
        assert_eq!(empty_name::<Vec<i64>>("[]"), Some("required int slice"));
        assert_eq!(empty_name::<Vec<String>>(r#"["a"]"#), None);
        assert_eq!(empty_name::<Vec<u8>>("[]"), Some("required bytes"));
    }

    #[test]
    fn keeps_the_decoded_value() {
        let ints: RequiredIntSlice = from_str("[3, 1, 2]").unwrap();
        assert_eq!(ints.into_inner(), Some(vec![3, 1, 2]));
        assert_eq!(format!("{:?}", RequiredInt::default()), "Required(<unset>)");
    }

    crate::aggregate! {
        #[derive(Debug, Default)]
        struct Contact {
            name: String,
            email: RequiredString,
        }
    }

    crate::aggregate! {
        #[derive(Debug, Default)]
        struct StrictContact {
            name: String,
            #[json = "email,required"]
            email: RequiredString,
        }
    }

    #[test]
    fn absent_wrapper_is_caught_only_with_the_required_modifier() {
        let contact: Contact = from_str(r#"{"name":"ann"}"#).unwrap();
        assert_eq!(contact.name, "ann");
        assert!(!contact.email.is_set());

        let err = from_str::<StrictContact>(r#"{"name":"ann"}"#).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::RequiredFieldMissing));
        assert_eq!(err.path().to_string(), "email");

        let err = from_str::<Contact>(r#"{"name":"ann","email":null}"#).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ValueInvalid(ValueError::Empty("required string"))
        ));
    }
}
