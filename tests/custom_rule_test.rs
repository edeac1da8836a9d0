//! Tests for registering custom predicates.

use serde::Serialize;
use serde_json::{json, Value};
use tagcheck::{ParamKind, ParseError, PredicateRule, RegistryError, StructSchema, Validator, ValidatorError};

fn valid_username() -> PredicateRule {
    PredicateRule::simple(|value, _| {
        value
            .as_str()
            .map_or(false, |s| s == s.to_uppercase() && s.chars().count() >= 5)
    })
}

fn pin() -> PredicateRule {
    PredicateRule::simple(|value: &Value, param: &str| {
        let length: usize = param.parse().unwrap_or(0);
        value
            .as_str()
            .map_or(false, |s| s.len() == length && s.bytes().all(|b| b.is_ascii_digit()))
    })
    .with_param(ParamKind::Integer)
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LoginRequest {
    username: String,
    password: String,
}

#[test]
fn test_custom_username_rule() {
    let validator = Validator::new();
    validator.register_validation("username", valid_username()).unwrap();

    let schema = StructSchema::new("LoginRequest")
        .field("Username", "required,username")
        .field("Password", "required");

    let bad = LoginRequest {
        username: "dicki".into(),
        password: "rahasia".into(),
    };
    let errors = validator
        .validate(&schema, &bad)
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(errors.first().tag, "username");

    let good = LoginRequest {
        username: "DICKI".into(),
        password: "rahasia".into(),
    };
    assert!(validator.validate(&schema, &good).unwrap().is_success());
}

#[test]
fn test_custom_rule_with_parameter() {
    let validator = Validator::new();
    validator.register_validation("pin", pin()).unwrap();

    let schema = StructSchema::new("Login")
        .field("Phone", "required,number")
        .field("Pin", "required,pin=6");

    assert!(validator
        .validate_struct(&schema, &json!({"Phone": "08123", "Pin": "123456"}))
        .unwrap()
        .is_success());

    let errors = validator
        .validate_struct(&schema, &json!({"Phone": "08123", "Pin": "1234"}))
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(errors.first().tag, "pin");
    assert_eq!(errors.first().param, "6");
}

#[test]
fn test_malformed_parameter_rejected_before_evaluation() {
    let validator = Validator::new();
    validator.register_validation("pin", pin()).unwrap();

    let err = validator.validate_var(&json!("1234"), "pin=four").unwrap_err();
    match err {
        ValidatorError::Parse { source, .. } => assert_eq!(
            source,
            ParseError::InvalidParam {
                rule: "pin".into(),
                param: "four".into(),
                reason: "expected an integer".into(),
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_required_parameter_kind() {
    let validator = Validator::new();
    validator
        .register_validation(
            "oneof",
            PredicateRule::simple(|value, param| {
                value
                    .as_str()
                    .map_or(false, |s| param.split(' ').any(|option| option == s))
            })
            .with_param(ParamKind::Required),
        )
        .unwrap();

    assert!(validator.validate_var(&json!("red"), "oneof=red green").unwrap().is_success());
    assert!(validator.validate_var(&json!("blue"), "oneof=red green").unwrap().is_failure());
    assert!(validator.validate_var(&json!("red"), "oneof").is_err());
}

#[test]
fn test_reregistration_replaces_rule() {
    let validator = Validator::new();
    validator
        .register_validation("always", PredicateRule::simple(|_, _| false))
        .unwrap();
    assert!(validator.validate_var(&json!("x"), "always").unwrap().is_failure());

    validator
        .register_validation("always", PredicateRule::simple(|_, _| true))
        .unwrap();
    assert!(validator.validate_var(&json!("x"), "always").unwrap().is_success());
}

#[test]
fn test_reserved_names_rejected() {
    let validator = Validator::new();
    for name in ["dive", "keys", "endkeys"] {
        assert!(matches!(
            validator.register_validation(name, PredicateRule::simple(|_, _| true)),
            Err(RegistryError::ReservedName(_))
        ));
    }
    assert!(matches!(
        validator.register_validation("a,b", PredicateRule::simple(|_, _| true)),
        Err(RegistryError::InvalidName(_))
    ));
}
