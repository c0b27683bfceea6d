use quickcheck::{Arbitrary, Gen};

use crate::{Array, Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonNumber(f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn scalar(g: &mut Gen) -> Value {
            match usize::arbitrary(g) % 5 {
                0 => Value::Null,
                1 => Value::Boolean(bool::arbitrary(g)),
                2 => Value::Integer(i64::arbitrary(g)),
                3 => Value::Float(JsonNumber::arbitrary(g).0),
                _ => Value::String(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                return scalar(g);
            }
            match usize::arbitrary(g) % 3 {
                0 => scalar(g),
                1 => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect::<Array>())
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Array(items) => Box::new(items.clone().into_iter()),
            Value::Object(map) => Box::new(map.clone().into_values()),
            Value::String(s) => Box::new(s.shrink().map(Value::String)),
            _ => quickcheck::empty_shrinker(),
        }
    }
}
