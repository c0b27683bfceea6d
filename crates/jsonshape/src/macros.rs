/// Declares a struct and implements [`Aggregate`](crate::Aggregate) and
/// [`Decode`](crate::Decode) for it.
///
/// A field may carry a `#[json = "<annotation>"]` attribute with the
/// annotation grammar `"<name>[,required][,omitifempty]"`. Fields without a
/// name take the snake case of their identifier. Other field attributes,
/// doc comments included, are kept on the field. A trailing
/// `validate = <path>;` names a `fn(&Self) -> Result<(), ValueError>` that
/// runs after the fields are decoded.
///
/// Every field type must implement [`Decode`](crate::Decode); containers of
/// the struct also need it to implement `Default`.
///
/// ```rust
/// use jsonshape::{ValueError, aggregate};
///
/// aggregate! {
///     #[derive(Debug, Default)]
///     pub struct Person {
///         /// Full name as printed on the card.
///         #[json = "name,required"]
///         pub name: String,
///         pub PostalCode: Option<u32>,
///         pub tags: Vec<String>,
///     }
///     validate = Person::check;
/// }
///
/// impl Person {
///     fn check(&self) -> Result<(), ValueError> {
///         if self.tags.len() > 3 {
///             return Err(ValueError::Invalid("too many tags".into()));
///         }
///         Ok(())
///     }
/// }
///
/// let p: Person = jsonshape::from_str(r#"{"name": "lasse", "postal_code": 2100}"#).unwrap();
/// assert_eq!(p.name, "lasse");
/// assert_eq!(p.PostalCode, Some(2100));
///
/// let err = jsonshape::from_str::<Person>(r#"{"tags": []}"#).unwrap_err();
/// assert_eq!(err.path().to_string(), "name");
/// ```
#[macro_export]
macro_rules! aggregate {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($fattr:tt)*])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
        $(validate = $check:path;)?
    ) => {
        $crate::__aggregate_struct! {
            [$(#[$meta])* $vis struct $name]
            []
            $( [$(#[$($fattr)*])*] [$fvis $field: $ty] )*
        }

        impl $crate::Aggregate for $name {
            const FIELDS: &'static [$crate::FieldDef] = &[
                $(
                    $crate::FieldDef::new(
                        stringify!($field),
                        $crate::__annotation!($([$($fattr)*])*),
                    ),
                )*
            ];
            const VALIDATES: bool = $crate::__validates!($($check)?);

            #[allow(unused_mut, unused_variables, unused_assignments)]
            fn decode_field<'src, R: $crate::Read<'src>>(
                &mut self,
                index: usize,
                de: &mut $crate::Decoder<'src, R>,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                let mut at = 0usize;
                $(
                    if index == at {
                        return de.decode(&mut self.$field);
                    }
                    at += 1;
                )*
                ::core::result::Result::Ok(())
            }

            $(
                fn validate(&self) -> ::core::result::Result<(), $crate::ValueError> {
                    $check(self)
                }
            )?
        }

        impl $crate::Decode for $name {
            const SHAPE: $crate::Shape = $crate::Shape::Aggregate;

            fn decode<'src, R: $crate::Read<'src>>(
                &mut self,
                de: &mut $crate::Decoder<'src, R>,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                de.decode_aggregate(self)
            }
        }
    };
}

/// Emits the struct of an [`aggregate!`], keeping every field attribute
/// except `#[json = ...]`.
#[doc(hidden)]
#[macro_export]
macro_rules! __aggregate_struct {
    (@attrs $head:tt [$($out:tt)*] [$($kept:tt)*] [#[json = $tag:literal] $($more:tt)*] $field:tt $($rest:tt)*) => {
        $crate::__aggregate_struct! { @attrs $head [$($out)*] [$($kept)*] [$($more)*] $field $($rest)* }
    };
    (@attrs $head:tt [$($out:tt)*] [$($kept:tt)*] [#[$($attr:tt)*] $($more:tt)*] $field:tt $($rest:tt)*) => {
        $crate::__aggregate_struct! { @attrs $head [$($out)*] [$($kept)* #[$($attr)*]] [$($more)*] $field $($rest)* }
    };
    (@attrs $head:tt [$($out:tt)*] [$($kept:tt)*] [] [$($field:tt)*] $($rest:tt)*) => {
        $crate::__aggregate_struct! { $head [$($out)* $($kept)* $($field)*,] $($rest)* }
    };
    ([$($head:tt)*] [$($out:tt)*]) => {
        $($head)* { $($out)* }
    };
    ($head:tt $out:tt $attrs:tt $field:tt $($rest:tt)*) => {
        $crate::__aggregate_struct! { @attrs $head $out [] $attrs $field $($rest)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __annotation {
    () => {
        ::core::option::Option::None
    };
    ([json = $tag:literal] $($rest:tt)*) => {
        ::core::option::Option::Some($tag)
    };
    ([$($other:tt)*] $($rest:tt)*) => {
        $crate::__annotation!($($rest)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __validates {
    () => {
        false
    };
    ($check:path) => {
        true
    };
}

/// Builds a [`FieldPath`](crate::FieldPath) from keys and indices.
///
/// ```rust
/// use jsonshape::path;
///
/// assert_eq!(path!["order", "items", 2, "sku"].to_string(), "order.items[2].sku");
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathSegmentFrom;
        <$crate::FieldPath as ::core::iter::FromIterator<$crate::PathSegment>>::from_iter([
            $( $crate::PathSegment::from_path_segment($elem) ),*
        ])
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Aggregate, FieldDef, from_str};

    aggregate! {
        /// A card holder.
        #[derive(Debug, Default)]
        struct Holder {
            /// Printed name.
            #[json = "name,required"]
            name: String,
            #[allow(dead_code)]
            /// Internal number, never shown.
            #[json = "no"]
            number: u32,
            /// Derived name.
            #[allow(non_snake_case)]
            CardType: Option<String>,
        }
    }

    #[test]
    fn keeps_field_attributes_and_finds_annotations() {
        assert_eq!(
            Holder::FIELDS,
            [
                FieldDef::new("name", Some("name,required")),
                FieldDef::new("number", Some("no")),
                FieldDef::new("CardType", None),
            ]
        );
        let holder: Holder = from_str(r#"{"name": "ann", "no": 7, "card_type": "gold"}"#).unwrap();
        assert_eq!(holder.name, "ann");
        assert_eq!(holder.number, 7);
        assert_eq!(holder.CardType.as_deref(), Some("gold"));
    }
}
