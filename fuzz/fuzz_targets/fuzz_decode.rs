#![no_main]
use std::io;

use arbitrary::Arbitrary;
use jsonshape::{RequiredString, Value, aggregate, from_reader, from_slice};
use libfuzzer_sys::fuzz_target;

aggregate! {
    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        #[json = "id,required"]
        id: i64,
        name: RequiredString,
        tags: Vec<String>,
        nested: Option<Box<Probe>>,
        extra: Value,
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    chunk: u8,
    data: Vec<u8>,
}

/// Hands out at most `chunk` bytes per read.
struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Structural equality with numbers compared by value.
fn same(ours: &Value, theirs: &serde_json::Value) -> bool {
    match (ours, theirs) {
        (Value::Null, serde_json::Value::Null) => true,
        (Value::Boolean(a), serde_json::Value::Bool(b)) => a == b,
        #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
        (Value::Integer(a), serde_json::Value::Number(b)) => {
            b.as_i64() == Some(*a) || b.as_f64() == Some(*a as f64)
        }
        #[allow(clippy::float_cmp)]
        (Value::Float(a), serde_json::Value::Number(b)) => b.as_f64() == Some(*a),
        (Value::String(a), serde_json::Value::String(b)) => a == b,
        (Value::Array(a), serde_json::Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y))
        }
        (Value::Object(a), serde_json::Value::Object(b)) => {
            a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| same(v, w)))
        }
        _ => false,
    }
}

fuzz_target!(|input: Input| {
    let chunk = usize::from(input.chunk.max(1));

    let sliced = from_slice::<Value>(&input.data);
    let streamed = from_reader::<Value, _>(Trickle {
        data: &input.data,
        chunk,
    });
    match (&sliced, &streamed) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        _ => panic!("slice and reader disagree: {sliced:?} vs {streamed:?}"),
    }

    if let (Ok(ours), Ok(theirs)) = (&sliced, serde_json::from_slice::<serde_json::Value>(&input.data)) {
        assert!(same(ours, &theirs), "{ours:?} != {theirs:?}");
    }

    let _ = from_slice::<Probe>(&input.data);
});
