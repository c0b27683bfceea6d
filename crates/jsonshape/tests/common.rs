#![allow(missing_docs, dead_code)]

use std::{collections::HashMap, io};

use jsonshape::{RequiredString, Value, ValueError, aggregate};

aggregate! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Customer {
        #[json = "email,required"]
        pub email: RequiredString,
        pub name: Option<String>,
    }
}

aggregate! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct LineItem {
        #[json = "sku,required"]
        pub sku: RequiredString,
        pub quantity: u32,
        #[json = "unit_price,omitifempty"]
        pub price: f64,
    }
}

aggregate! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Order {
        #[json = "id,required"]
        pub id: u64,
        pub customer: Customer,
        pub items: Vec<LineItem>,
        pub notes: Option<String>,
        pub metadata: HashMap<String, Value>,
    }
    validate = Order::check;
}

impl Order {
    fn check(&self) -> Result<(), ValueError> {
        if self.items.iter().any(|item| item.quantity == 0) {
            return Err(ValueError::Invalid("line item with zero quantity".into()));
        }
        Ok(())
    }
}

pub const ORDER: &str = r#"
{
    "id": 1042,
    "customer": {
        "email": "ann@example.com",
        "name": "Ann \"the buyer\" Lee"
    },
    "items": [
        {
            "sku": "BOLT-12",
            "quantity": 40,
            "unit_price": 0.25
        },
        {
            "sku": "NUT-12",
            "quantity": 40,
            "unit_price": 0.1
        }
    ],
    "notes": null,
    "metadata": {
        "channel": "web",
        "tags": ["rush", "wholesale"],
        "score": 9.5
    },
    "tracking": {
        "carrier": "ups",
        "events": [{"at": "2024-01-01"}, {"at": "2024-01-02"}]
    }
}"#;

/// A reader that hands out at most `chunk` bytes per call, so that tokens
/// straddle buffer refills.
pub struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> Trickle<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        assert!(chunk > 0);
        Self { data, chunk }
    }
}

impl io::Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

pub fn expected_order() -> Order {
    let mut metadata = HashMap::new();
    metadata.insert("channel".to_owned(), Value::from("web"));
    metadata.insert(
        "tags".to_owned(),
        Value::Array(vec![Value::from("rush"), Value::from("wholesale")]),
    );
    metadata.insert("score".to_owned(), Value::Float(9.5));
    Order {
        id: 1042,
        customer: Customer {
            email: RequiredString::new("ann@example.com".to_owned()),
            name: Some("Ann \"the buyer\" Lee".to_owned()),
        },
        items: vec![
            LineItem {
                sku: RequiredString::new("BOLT-12".to_owned()),
                quantity: 40,
                price: 0.25,
            },
            LineItem {
                sku: RequiredString::new("NUT-12".to_owned()),
                quantity: 40,
                price: 0.1,
            },
        ],
        notes: None,
        metadata,
    }
}

/// Converts a `serde_json` value into ours, mapping numbers the same way the
/// decoder does.
pub fn from_serde(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, from_serde(v)))
                .collect(),
        ),
    }
}
