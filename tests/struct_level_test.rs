//! Tests for struct-level validators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tagcheck::{FailureKind, FieldError, FieldPath, StructSchema, Validator};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterRequest {
    username: String,
    email: String,
    phone: String,
    password: String,
}

fn register_schema() -> StructSchema {
    StructSchema::new("RegisterRequest")
        .field("Username", "required")
        .field("Email", "required,email")
        .field("Phone", "required,numeric")
        .field("Password", "required,min=5")
}

fn register_validator(calls: Arc<AtomicUsize>) -> Validator {
    let validator = Validator::new();
    validator
        .register_struct_validation("RegisterRequest", move |level| {
            calls.fetch_add(1, Ordering::SeqCst);
            let username = level.field("Username");
            if username != level.field("Email") && username != level.field("Phone") {
                level.report_error("Username", "username", "");
            }
        })
        .unwrap();
    validator
}

#[test]
fn test_struct_level_passes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let validator = register_validator(Arc::clone(&calls));

    let request = RegisterRequest {
        username: "0800".into(),
        email: "dicki@mail.com".into(),
        phone: "0800".into(),
        password: "rahasia".into(),
    };
    assert!(validator.validate(&register_schema(), &request).unwrap().is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_struct_level_failure_is_appended_after_field_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let validator = register_validator(Arc::clone(&calls));

    let request = RegisterRequest {
        username: "dicki".into(),
        email: "dicki@mail.com".into(),
        phone: "0800".into(),
        password: "ki".into(),
    };
    let errors = validator
        .validate(&register_schema(), &request)
        .unwrap()
        .into_result()
        .unwrap_err()
        .into_vec();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(errors.len(), 2);

    assert_eq!(errors[0].field(), "Password");
    assert_eq!(errors[0].kind, FailureKind::Field);

    let last = &errors[1];
    assert_eq!(last.field(), "Username");
    assert_eq!(last.tag, "username");
    assert_eq!(last.kind, FailureKind::StructLevel);
    assert_eq!(last.value, Some(json!("dicki")));
}

#[test]
fn test_struct_level_runs_for_each_nested_record() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let validator = Validator::new();
    validator
        .register_struct_validation("Address", move |level| {
            counter.fetch_add(1, Ordering::SeqCst);
            if level.field("City") == level.field("Country") {
                level.report_error("", "distinct_city", "");
            }
        })
        .unwrap();

    let address = StructSchema::new("Address")
        .field("City", "required")
        .field("Country", "required");
    let user = StructSchema::new("User")
        .field("Id", "required")
        .list("Addresses", "dive", address);

    let errors = validator
        .validate_struct(
            &user,
            &json!({
                "Id": "",
                "Addresses": [
                    {"City": "Jakarta", "Country": "Indonesia"},
                    {"City": "Singapore", "Country": "Singapore"}
                ]
            }),
        )
        .unwrap()
        .into_result()
        .unwrap_err()
        .into_vec();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].path, FieldPath::from_field("Id"));
    assert_eq!(errors[1].path.to_string(), "Addresses[1]");
    assert_eq!(errors[1].kind, FailureKind::StructLevel);
}

#[test]
fn test_report_with_custom_message() {
    let validator = Validator::new();
    validator
        .register_struct_validation("Order", |level| {
            let quantity = level.field("Quantity").as_f64().unwrap_or(0.0);
            let price = level.field("UnitPrice").as_f64().unwrap_or(0.0);
            let total = level.field("Total").as_f64().unwrap_or(0.0);
            if quantity * price != total {
                level.report(
                    FieldError::new(FieldPath::from_field("Total"), "total")
                        .with_message("total must equal quantity * unit price"),
                );
            }
        })
        .unwrap();

    let schema = StructSchema::new("Order")
        .field("Quantity", "gt=0")
        .field("UnitPrice", "gt=0")
        .field("Total", "");

    let errors = validator
        .validate_struct(&schema, &json!({"Quantity": 3, "UnitPrice": 10, "Total": 25}))
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().message, "total must equal quantity * unit price");
    assert_eq!(errors.first().kind, FailureKind::StructLevel);
}

#[test]
fn test_unregistered_schema_name_runs_no_hook() {
    let calls = Arc::new(AtomicUsize::new(0));
    let validator = register_validator(Arc::clone(&calls));
    let schema = StructSchema::new("Other").field("Username", "required");

    assert!(validator
        .validate_struct(&schema, &json!({"Username": "dicki"}))
        .unwrap()
        .is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
