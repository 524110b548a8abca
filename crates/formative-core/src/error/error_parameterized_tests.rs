#![allow(non_snake_case)]

use super::*;
use serde_json::{Value, json};
use test_case::test_case;

// ============================================================================
// Parameterized node kind naming
// ============================================================================

#[test_case(Value::Null, "null")]
#[test_case(json!(true), "boolean")]
#[test_case(json!(1.5), "number")]
#[test_case(json!("s"), "string")]
#[test_case(json!([1]), "array")]
#[test_case(json!({"k": 1}), "object")]
fn value_kind___node___names_kind(value: Value, expected: &str) {
    assert_eq!(value_kind(&value), expected);
}

// ============================================================================
// Parameterized derive error display
// ============================================================================

#[test_case(
    DeriveError::NoDeconstructor { type_name: "T".into() },
    "T has no deconstructor"
)]
#[test_case(
    DeriveError::NoConstructor { type_name: "T".into() },
    "T has no constructor"
)]
#[test_case(
    DeriveError::EmptyProduct { type_name: "T".into() },
    "T has no fields"
)]
#[test_case(
    DeriveError::NoAccessors { type_name: "T".into() },
    "T exposes no accessors"
)]
fn DeriveError___variant___displays_message(error: DeriveError, expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test_case(ReadError::MissingPath, "missing path")]
#[test_case(ReadError::Unresolved("Node".into()), "recursive codec for Node is not bound")]
#[test_case(ReadError::ArgumentMismatch("u8".into()), "decoded value is not a u8")]
#[test_case(ReadError::Invalid("nope".into()), "nope")]
fn ReadError___variant___displays_message(error: ReadError, expected: &str) {
    assert_eq!(error.to_string(), expected);
}
