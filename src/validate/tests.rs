//! Unit tests for argument validation

use super::error::ValidationError;
use super::validator::validate_args;
use crate::args::{ArgValue, ArgumentMap, TypeTag};
use crate::schema::SchemaTable;

fn args<const N: usize>(entries: [(&str, ArgValue); N]) -> ArgumentMap {
    entries.into_iter().collect()
}

#[test]
fn test_empty_args_valid_for_every_method() {
    let table = SchemaTable::builtin();
    for method in table.method_names() {
        assert!(
            validate_args(&table, method, &ArgumentMap::new()).is_ok(),
            "empty args should be valid for {method}"
        );
    }
}

#[test]
fn test_bnb_valid_arguments() {
    let table = SchemaTable::builtin();
    let args = args([
        ("quant_type", ArgValue::from("4bit")),
        ("bnb_4bit_compute_dtype", ArgValue::from("bfloat16")),
    ]);
    assert!(validate_args(&table, "bnb", &args).is_ok());
}

#[test]
fn test_unknown_method() {
    let table = SchemaTable::builtin();
    let err = validate_args(&table, "unknown_method", &ArgumentMap::new()).unwrap_err();
    match err {
        ValidationError::UnknownMethod { method, known } => {
            assert_eq!(method, "unknown_method");
            assert_eq!(known, vec!["aqlm", "awq", "bnb", "gptq"]);
        }
        other => panic!("expected UnknownMethod, got {other:?}"),
    }
}

#[test]
fn test_unknown_method_wins_over_bad_args() {
    // Method resolution happens first; the argument map is never inspected.
    let table = SchemaTable::builtin();
    let args = args([("nonsense", ArgValue::from(-1))]);
    let err = validate_args(&table, "sparse", &args).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownMethod { .. }));
}

#[test]
fn test_unrecognized_parameter() {
    let table = SchemaTable::builtin();
    let args = args([("gptq_group_size", ArgValue::from(128))]);
    let err = validate_args(&table, "bnb", &args).unwrap_err();
    match err {
        ValidationError::UnrecognizedParameter { method, key, valid } => {
            assert_eq!(method, "bnb");
            assert_eq!(key, "gptq_group_size");
            assert!(valid.contains(&"quant_type".to_string()));
        }
        other => panic!("expected UnrecognizedParameter, got {other:?}"),
    }
}

#[test]
fn test_value_not_allowed() {
    let table = SchemaTable::builtin();
    let args = args([("quant_type", ArgValue::from("16bit"))]);
    let err = validate_args(&table, "bnb", &args).unwrap_err();
    match err {
        ValidationError::ValueNotAllowed {
            key,
            allowed,
            actual,
        } => {
            assert_eq!(key, "quant_type");
            assert_eq!(allowed, vec![ArgValue::from("4bit"), ArgValue::from("8bit")]);
            assert_eq!(actual, ArgValue::from("16bit"));
        }
        other => panic!("expected ValueNotAllowed, got {other:?}"),
    }
}

#[test]
fn test_type_mismatch() {
    // Group size as a string instead of an integer.
    let table = SchemaTable::builtin();
    let args = args([("gptq_group_size", ArgValue::from("128"))]);
    let err = validate_args(&table, "gptq", &args).unwrap_err();
    match err {
        ValidationError::TypeMismatch {
            key,
            expected,
            actual,
        } => {
            assert_eq!(key, "gptq_group_size");
            assert_eq!(expected, vec![TypeTag::Int]);
            assert_eq!(actual, TypeTag::Str);
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_calib_dataset_accepts_both_shapes() {
    let table = SchemaTable::builtin();
    let as_ref = args([("calib_dataset", ArgValue::from("allenai/c4"))]);
    assert!(validate_args(&table, "gptq", &as_ref).is_ok());

    let inline = args([(
        "calib_dataset",
        ArgValue::List(vec!["some calibration text".to_string()]),
    )]);
    assert!(validate_args(&table, "gptq", &inline).is_ok());

    let bad = args([("calib_dataset", ArgValue::from(1024))]);
    assert!(matches!(
        validate_args(&table, "gptq", &bad),
        Err(ValidationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_boolean_enums_reject_strings() {
    let table = SchemaTable::builtin();
    let args = args([("save_tokenizer", ArgValue::from("true"))]);
    assert!(matches!(
        validate_args(&table, "bnb", &args),
        Err(ValidationError::ValueNotAllowed { .. })
    ));
}

#[test]
fn test_recognition_precedes_constraints() {
    // An unrecognized key is reported even when another key also carries an
    // illegal value.
    let table = SchemaTable::builtin();
    let args = args([
        ("quant_type", ArgValue::from("16bit")),
        ("zzz_bogus", ArgValue::from(1)),
    ]);
    let err = validate_args(&table, "bnb", &args).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::UnrecognizedParameter { .. }
    ));
}

#[test]
fn test_validation_is_idempotent() {
    let table = SchemaTable::builtin();
    let args = args([("quant_type", ArgValue::from("16bit"))]);
    let first = validate_args(&table, "bnb", &args).unwrap_err();
    let second = validate_args(&table, "bnb", &args).unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_error_messages_name_the_alternatives() {
    let table = SchemaTable::builtin();

    let err = validate_args(&table, "nope", &ArgumentMap::new()).unwrap_err();
    assert!(err.to_string().contains("gptq"));

    let bad_value = args([("quant_type", ArgValue::from("16bit"))]);
    let err = validate_args(&table, "bnb", &bad_value).unwrap_err();
    assert!(err.to_string().contains("4bit"));
    assert!(err.to_string().contains("8bit"));

    let bad_type = args([("batch_size", ArgValue::from("4"))]);
    let err = validate_args(&table, "gptq", &bad_type).unwrap_err();
    assert!(err.to_string().contains("integer"));
    assert!(err.to_string().contains("string"));
}
