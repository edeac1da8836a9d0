//! Tests for rule aliases.

use serde::Serialize;
use serde_json::json;
use tagcheck::{ParseError, RegistryError, StructSchema, Validator};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Seller {
    id: String,
    name: String,
    owner: String,
    slogan: String,
}

#[test]
fn test_alias_in_struct_schema() {
    let validator = Validator::new();
    validator.register_alias("varchar", "required,max=255").unwrap();

    let schema = StructSchema::new("Seller")
        .field("Id", "varchar,min=3")
        .field("Name", "varchar")
        .field("Owner", "varchar")
        .field("Slogan", "varchar");

    let seller = Seller {
        id: "12".into(),
        name: String::new(),
        owner: "x".repeat(256),
        slogan: "murah".into(),
    };

    let errors = validator
        .validate(&schema, &seller)
        .unwrap()
        .into_result()
        .unwrap_err();
    let summary: Vec<_> = errors
        .iter()
        .map(|e| (e.field(), e.tag.as_str()))
        .collect();
    assert_eq!(summary, vec![("Id", "min"), ("Name", "required"), ("Owner", "max")]);
}

#[test]
fn test_alias_is_transparent() {
    let validator = Validator::new();
    validator.register_alias("varchar", "required,max=5").unwrap();

    for value in [json!(""), json!("abc"), json!("abcdefgh"), json!(null)] {
        let aliased = validator.validate_var(&value, "varchar").unwrap();
        let direct = validator.validate_var(&value, "required,max=5").unwrap();
        assert_eq!(aliased.into_result().err(), direct.into_result().err());
    }
}

#[test]
fn test_alias_of_alias() {
    let validator = Validator::new();
    validator.register_alias("varchar", "required,max=255").unwrap();
    validator.register_alias("short_name", "varchar,min=3").unwrap();

    let errors = validator
        .validate_var(&json!("ab"), "short_name")
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(errors.first().tag, "min");
}

#[test]
fn test_alias_cycle_rejected_at_registration() {
    let validator = Validator::new();
    validator.register_alias("a", "required").unwrap();
    validator.register_alias("b", "a,min=1").unwrap();

    let err = validator.register_alias("a", "b").unwrap_err();
    match err {
        RegistryError::InvalidAlias { alias, source } => {
            assert_eq!(alias, "a");
            assert!(matches!(source, ParseError::AliasCycle(_)));
        }
        other => panic!("unexpected error: {}", other),
    }

    assert!(validator.validate_var(&json!("x"), "b").unwrap().is_success());
}

#[test]
fn test_alias_referencing_unknown_rule_rejected() {
    let validator = Validator::new();
    assert!(matches!(
        validator.register_alias("handle", "required,username"),
        Err(RegistryError::InvalidAlias {
            source: ParseError::UnknownRule(_),
            ..
        })
    ));
}

#[test]
fn test_alias_does_not_take_parameter() {
    let validator = Validator::new();
    validator.register_alias("varchar", "required,max=255").unwrap();
    assert!(validator.validate_var(&json!("x"), "varchar=10").is_err());
}
