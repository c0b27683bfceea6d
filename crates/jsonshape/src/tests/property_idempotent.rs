use std::thread;

use quickcheck::QuickCheck;

use super::quickcheck_tests;
use crate::{DecodeError, RequiredString, aggregate, from_str};

aggregate! {
    #[derive(Debug, Default, PartialEq)]
    struct Account {
        #[json = "id,required"]
        id: u64,
        #[json = "owner,required"]
        owner: RequiredString,
        nickname: Option<String>,
        balances: Vec<i64>,
    }
}

fn render(id: u64, owner: &str, nickname: Option<&str>, balances: &[i64]) -> String {
    let mut fields = vec![
        format!(r#""id":{id}"#),
        format!(r#""owner":{}"#, serde_json::Value::from(owner)),
        format!(r#""balances":{}"#, serde_json::Value::from(balances.to_vec())),
    ];
    if let Some(nick) = nickname {
        fields.push(format!(r#""nickname":{}"#, serde_json::Value::from(nick)));
    }
    format!("{{{}}}", fields.join(","))
}

fn outcome(src: &str) -> Result<Account, String> {
    from_str::<Account>(src).map_err(|e: DecodeError| e.to_string())
}

/// Property: decoding the same input into fresh destinations gives the same
/// result every time, including the same required-field errors.
#[test]
fn repeated_decodes_agree() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(id: u64, owner: String, nickname: Option<String>, balances: Vec<i64>) -> bool {
        let src = render(id, &owner, nickname.as_deref(), &balances);
        let first = outcome(&src);
        let second = outcome(&src);
        let expected_ok = !owner.is_empty();
        first == second && first.is_ok() == expected_ok
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(u64, String, Option<String>, Vec<i64>) -> bool);
}

#[test]
fn missing_field_does_not_leak_into_the_next_decode() {
    let complete = r#"{"id": 1, "owner": "ann"}"#;
    let missing = r#"{"owner": "ann"}"#;
    assert!(outcome(complete).is_ok());
    let err = from_str::<Account>(missing).unwrap_err();
    assert!(err.is_required());
    assert_eq!(err.path().to_string(), "id");
    assert!(outcome(complete).is_ok());
    assert!(outcome(missing).is_err());
}

#[test]
fn concurrent_decodes_of_one_shape_are_independent() {
    let inputs = [
        r#"{"id": 1, "owner": "ann", "balances": [1, 2]}"#,
        r#"{"owner": "bob"}"#,
        r#"{"id": 3, "owner": ""}"#,
        r#"{"id": 4, "owner": "dee", "nickname": "d"}"#,
    ];
    let expected: Vec<_> = inputs.iter().map(|src| outcome(src)).collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..200)
                        .map(|_| inputs.iter().map(|src| outcome(src)).collect::<Vec<_>>())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for round in handle.join().unwrap() {
                assert_eq!(round, expected);
            }
        }
    });
}
