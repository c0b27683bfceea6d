#![allow(missing_docs)]

mod common;

use common::{Customer, Order};
use jsonshape::{
    Decode, DecodeError, DecoderOptions, UnknownFields, Value, aggregate, decode_with, from_str,
};

aggregate! {
    #[derive(Debug, Default)]
    struct Mistagged {
        #[json = "id,mandatory"]
        id: u64,
    }
}

fn render<T: Decode + Default>(input: &str) -> String {
    from_str::<T>(input).map_or_else(|e: DecodeError| e.to_string(), |_| "ok".to_owned())
}

fn render_with<T: Decode + Default>(input: &str, options: DecoderOptions) -> String {
    let mut dst = T::default();
    decode_with(input.as_bytes(), &mut dst, options)
        .map_or_else(|e| e.to_string(), |()| "ok".to_owned())
}

#[test]
fn snapshot_required_field_errors() {
    insta::assert_snapshot!(render::<Customer>(r#"{"name": "ann"}"#), @"required field missing at `email` (byte 15)");
    insta::assert_snapshot!(render::<Customer>(r#"{"email": ""}"#), @"value failed validation: required string not allowed to be empty at `email` (byte 12)");
    insta::assert_snapshot!(render::<Order>(r#"{"id": 1, "items": [{"sku": "a"}, {"quantity": 2}]}"#), @"required field missing at `items[1].sku` (byte 49)");
}

#[test]
fn snapshot_value_errors() {
    insta::assert_snapshot!(render::<Order>(r#"{"id": "7"}"#), @"invalid value `7`: expected an integer at `id` (byte 10)");
    insta::assert_snapshot!(render::<Order>(r#"{"customer": [1]}"#), @"cannot decode an array into an aggregate at `customer` (byte 14)");
    insta::assert_snapshot!(render::<Mistagged>(r#"{"id": 1}"#), @"illegal tag value `mandatory` on field `id` at byte 0");
}

#[test]
fn snapshot_syntax_errors() {
    insta::assert_snapshot!(render::<Vec<i32>>("[1, 2}"), @"unmatched brace: found `}`, expected `]` at byte 5");
    insta::assert_snapshot!(render::<Value>(r#"{"a": [1, 2]"#), @"missing closing brace: expected `}` at byte 12");
    insta::assert_snapshot!(render::<Value>("{} x"), @"invalid json: trailing characters after the root value at byte 4");
}

#[test]
fn snapshot_option_errors() {
    let deny = DecoderOptions {
        unknown_fields: UnknownFields::Deny,
        ..DecoderOptions::default()
    };
    let shallow = DecoderOptions {
        max_depth: 2,
        ..DecoderOptions::default()
    };
    insta::assert_snapshot!(render_with::<Order>(r#"{"id": 1, "phone": 1}"#, deny), @"unknown field at `phone` (byte 18)");
    insta::assert_snapshot!(render_with::<Value>("[[[1]]]", shallow), @"nesting exceeds the maximum depth of 2 at `[0][0]` (byte 3)");
    insta::assert_snapshot!(render_with::<Value>("[[1]]", shallow), @"ok");
}
