use std::collections::{BTreeMap, HashMap};

use rstest::rstest;

use crate::{Value, aggregate, from_str};

aggregate! {
    #[derive(Debug, Default, PartialEq)]
    struct Simple {
        name: String,
    }
}

aggregate! {
    #[derive(Debug, Default, PartialEq)]
    struct Everything {
        text: String,
        flag: bool,
        small: u8,
        big: i64,
        ratio: f64,
        maybe: Option<String>,
        boxed: Box<Simple>,
        list: Vec<i32>,
        grid: Vec<Vec<i32>>,
        lookup: HashMap<String, u32>,
        sorted: BTreeMap<String, bool>,
        anything: Value,
    }
}

#[test]
fn decodes_a_named_field() {
    let s: Simple = from_str(r#"{"name":"lasse"}"#).unwrap();
    assert_eq!(s.name, "lasse");
}

#[test]
fn decodes_every_shape() {
    let input = r#"{
        "text": "hi",
        "flag": true,
        "small": 255,
        "big": -9007199254740993,
        "ratio": 2,
        "maybe": "here",
        "boxed": {"name": "inner"},
        "list": [1, 2, 3, 4],
        "grid": [[1, 2, 3], [4, 5, 6]],
        "lookup": {"a": 1, "b": 2},
        "sorted": {"z": true, "a": false},
        "anything": {"deep": [null, 1.5]}
    }"#;
    let e: Everything = from_str(input).unwrap();
    assert_eq!(e.text, "hi");
    assert!(e.flag);
    assert_eq!(e.small, 255);
    assert_eq!(e.big, -9_007_199_254_740_993);
    assert!((e.ratio - 2.0).abs() < f64::EPSILON);
    assert_eq!(e.maybe.as_deref(), Some("here"));
    assert_eq!(e.boxed.name, "inner");
    assert_eq!(e.list.len(), 4);
    assert_eq!(e.list[2], 3);
    assert_eq!(e.grid[1][0], 4);
    assert_eq!(e.lookup.get("b"), Some(&2));
    assert_eq!(e.sorted.keys().collect::<Vec<_>>(), ["a", "z"]);
    assert_eq!(
        e.anything.get("deep"),
        Some(&Value::Array(vec![Value::Null, Value::Float(1.5)]))
    );
}

#[test]
fn null_leaves_destinations_untouched() {
    let e: Everything = from_str(
        r#"{"text": null, "maybe": null, "boxed": null, "list": null, "lookup": null, "anything": null}"#,
    )
    .unwrap();
    assert_eq!(e, Everything::default());
}

#[test]
fn empty_containers() {
    let e: Everything = from_str(r#"{"list": [], "grid": [[]], "lookup": {}, "boxed": {}}"#).unwrap();
    assert!(e.list.is_empty());
    assert_eq!(e.grid, vec![Vec::<i32>::new()]);
    assert!(e.lookup.is_empty());
    assert_eq!(*e.boxed, Simple::default());
}

#[test]
fn whitespace_is_insignificant() {
    let s: Simple = from_str(" \n\t{ \"name\" \r\n :\t\"x\" } \n").unwrap();
    assert_eq!(s.name, "x");
}

#[rstest]
#[case("null")]
#[case("true")]
#[case("-7")]
#[case("1e-7")]
#[case(r#""é\n""#)]
#[case("[]")]
#[case("{}")]
#[case(r#"[1, "two", [3.5, {"four": null}], {"": false}]"#)]
#[case(r#"{"a": {"b": {"c": [[[]]]}}, "d": 9223372036854775807}"#)]
#[case(r#"{"big": 18446744073709551615, "neg": -12e3}"#)]
fn values_agree_with_serde_json(#[case] input: &str) {
    let ours: Value = from_str(input).unwrap();
    let theirs: Value = serde_json::from_str(input).unwrap();
    assert_eq!(ours, theirs);
}

#[test]
fn existing_option_is_decoded_in_place() {
    let mut holder: Option<Simple> = Some(Simple { name: "old".into() });
    crate::decode(br"{}", &mut holder).unwrap();
    assert_eq!(holder.map(|s| s.name).as_deref(), Some("old"));
}
