//! Property-based tests for argument validation

use super::error::ValidationError;
use super::validator::validate_args;
use crate::args::{ArgValue, ArgumentMap};
use crate::schema::SchemaTable;
use proptest::prelude::*;

const METHODS: [&str; 4] = ["bnb", "gptq", "awq", "aqlm"];

fn arb_method() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(&METHODS[..])
}

fn arb_value() -> impl Strategy<Value = ArgValue> {
    prop_oneof![
        "[a-z0-9_/]{1,12}".prop_map(ArgValue::Str),
        any::<i64>().prop_map(ArgValue::Int),
        any::<bool>().prop_map(ArgValue::Bool),
        proptest::collection::vec("[a-z ]{1,8}", 1..4).prop_map(ArgValue::List),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_empty_args_always_valid(method in arb_method()) {
        let table = SchemaTable::builtin();
        prop_assert!(validate_args(&table, method, &ArgumentMap::new()).is_ok());
    }

    #[test]
    fn prop_unknown_method_always_fails(
        method in "[a-z]{1,10}",
        value in arb_value(),
    ) {
        prop_assume!(!METHODS.contains(&method.as_str()));
        let table = SchemaTable::builtin();
        let args: ArgumentMap = [("quant_type", value)].into_iter().collect();
        prop_assert!(matches!(
            validate_args(&table, &method, &args),
            Err(ValidationError::UnknownMethod { .. })
        ), "expected UnknownMethod");
    }

    #[test]
    fn prop_unknown_key_always_rejected(
        method in arb_method(),
        key in "[a-z_]{1,16}",
        value in arb_value(),
    ) {
        let table = SchemaTable::builtin();
        prop_assume!(!table.lookup(method).unwrap().contains_key(key.as_str()));
        let args: ArgumentMap = [(key, value)].into_iter().collect();
        prop_assert!(matches!(
            validate_args(&table, method, &args),
            Err(ValidationError::UnrecognizedParameter { .. })
        ), "expected UnrecognizedParameter");
    }

    #[test]
    fn prop_int_key_rejects_non_int(value in arb_value()) {
        prop_assume!(!matches!(value, ArgValue::Int(_)));
        let table = SchemaTable::builtin();
        let args: ArgumentMap = [("gptq_group_size", value)].into_iter().collect();
        prop_assert!(matches!(
            validate_args(&table, "gptq", &args),
            Err(ValidationError::TypeMismatch { .. })
        ), "expected TypeMismatch");
    }

    #[test]
    fn prop_int_key_accepts_any_int(size in any::<i64>()) {
        // The validator checks presence and type only; numeric meaning is
        // the engine's concern.
        let table = SchemaTable::builtin();
        let args: ArgumentMap = [("gptq_group_size", ArgValue::Int(size))].into_iter().collect();
        prop_assert!(validate_args(&table, "gptq", &args).is_ok());
    }

    #[test]
    fn prop_enum_key_rejects_values_outside_set(value in "[a-z0-9]{1,10}") {
        prop_assume!(value != "4bit" && value != "8bit");
        let table = SchemaTable::builtin();
        let args: ArgumentMap = [("quant_type", ArgValue::Str(value))].into_iter().collect();
        prop_assert!(matches!(
            validate_args(&table, "bnb", &args),
            Err(ValidationError::ValueNotAllowed { .. })
        ), "expected ValueNotAllowed");
    }

    #[test]
    fn prop_validation_is_pure(
        method in arb_method(),
        key in "[a-z_]{1,16}",
        value in arb_value(),
    ) {
        let table = SchemaTable::builtin();
        let args: ArgumentMap = [(key, value)].into_iter().collect();
        let first = validate_args(&table, method, &args);
        let second = validate_args(&table, method, &args);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        if let (Err(a), Err(b)) = (first, second) {
            prop_assert_eq!(a.to_string(), b.to_string());
        }
    }
}
