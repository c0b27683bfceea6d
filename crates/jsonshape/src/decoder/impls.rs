use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use super::{Decode, Decoder};
use crate::{
    error::{DecodeError, ValueError},
    read::Read,
    shape::Shape,
    token::{FromToken, TokenKind},
};

macro_rules! scalar_decode {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                const SHAPE: Shape = Shape::Scalar(<$t as FromToken>::KIND);

                fn decode<'src, R: Read<'src>>(
                    &mut self,
                    de: &mut Decoder<'src, R>,
                ) -> Result<(), DecodeError> {
                    if let Some(value) = de.decode_scalar::<$t>()? {
                        *self = value;
                    }
                    Ok(())
                }
            }
        )*
    };
}
scalar_decode!(
    String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl<T: Decode + Default> Decode for Option<T> {
    const SHAPE: Shape = Shape::Optional;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        if de.take_null()? {
            return Ok(());
        }
        self.get_or_insert_with(T::default).decode(de)
    }

    fn is_valid(&self) -> Result<(), ValueError> {
        self.as_ref().map_or(Ok(()), Decode::is_valid)
    }
}

impl<T: Decode> Decode for Box<T> {
    const SHAPE: Shape = Shape::Indirect;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        (**self).decode(de)
    }

    fn is_valid(&self) -> Result<(), ValueError> {
        (**self).is_valid()
    }
}

impl<T: Decode + Default> Decode for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        match de.next_kind()? {
            TokenKind::Null => Ok(()),
            TokenKind::OpenArray => {
                let mut items = Vec::with_capacity(3);
                de.decode_elements(|de, _| {
                    let mut item = T::default();
                    de.decode(&mut item)?;
                    items.push(item);
                    Ok(())
                })?;
                *self = items;
                Ok(())
            }
            found => Err(de.unexpected(found, Self::SHAPE)),
        }
    }
}

impl<V, S> Decode for HashMap<String, V, S>
where
    V: Decode + Default,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        match de.next_kind()? {
            TokenKind::Null => Ok(()),
            TokenKind::OpenObject => {
                let mut map = HashMap::default();
                de.decode_entries(|de, key| {
                    let mut value = V::default();
                    de.decode(&mut value)?;
                    map.insert(key.to_owned(), value);
                    Ok(())
                })?;
                *self = map;
                Ok(())
            }
            found => Err(de.unexpected(found, Self::SHAPE)),
        }
    }
}

impl<V: Decode + Default> Decode for BTreeMap<String, V> {
    const SHAPE: Shape = Shape::Map;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        match de.next_kind()? {
            TokenKind::Null => Ok(()),
            TokenKind::OpenObject => {
                let mut map = BTreeMap::new();
                de.decode_entries(|de, key| {
                    let mut value = V::default();
                    de.decode(&mut value)?;
                    map.insert(key.to_owned(), value);
                    Ok(())
                })?;
                *self = map;
                Ok(())
            }
            found => Err(de.unexpected(found, Self::SHAPE)),
        }
    }
}
