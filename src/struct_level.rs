//! Whole-record validation hooks.
//!
//! A struct-level validator sees an entire record after its field rules ran
//! and reports failures through [`StructLevel`]. Use it for rules that do not
//! fit a single field's rule string.

use serde_json::Value;

use crate::error::{FailureKind, FieldError};
use crate::path::FieldPath;

static NULL: Value = Value::Null;

/// Access to the record under validation and a sink for its failures.
///
/// # Example
///
/// ```rust
/// use tagcheck::{StructSchema, Validator};
/// use serde_json::json;
///
/// let validator = Validator::new();
/// validator
///     .register_struct_validation("RegisterRequest", |level| {
///         let username = level.field("Username").clone();
///         if &username != level.field("Email") && &username != level.field("Phone") {
///             level.report_error("Username", "username", "");
///         }
///     })
///     .unwrap();
///
/// let schema = StructSchema::new("RegisterRequest")
///     .field("Username", "required")
///     .field("Email", "required,email")
///     .field("Phone", "required,numeric");
///
/// let result = validator
///     .validate_struct(&schema, &json!({
///         "Username": "dicki",
///         "Email": "dicki@mail.com",
///         "Phone": "0800"
///     }))
///     .unwrap();
/// assert!(result.is_failure());
/// ```
pub struct StructLevel<'a> {
    record: &'a Value,
    path: FieldPath,
    errors: Vec<FieldError>,
}

impl<'a> StructLevel<'a> {
    pub(crate) fn new(record: &'a Value, path: FieldPath) -> Self {
        Self {
            record,
            path,
            errors: Vec::new(),
        }
    }

    /// Returns the whole record.
    pub fn current(&self) -> &'a Value {
        self.record
    }

    /// Returns the value of one field of the record, or null when absent.
    pub fn field(&self, name: &str) -> &'a Value {
        self.record.get(name).unwrap_or(&NULL)
    }

    /// Returns the path of the record inside the validated value.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Reports a failure of `tag` on the record field `field`.
    ///
    /// The failure carries the field's current value. An empty `field`
    /// reports against the record itself.
    pub fn report_error(&mut self, field: &str, tag: &str, param: &str) {
        let path = if field.is_empty() {
            self.path.clone()
        } else {
            self.path.push_field(field)
        };
        let value = if field.is_empty() {
            self.record
        } else {
            self.field(field)
        };
        self.errors.push(
            FieldError::new(path, tag)
                .with_param(param)
                .with_kind(FailureKind::StructLevel)
                .with_value(value.clone()),
        );
    }

    /// Reports a prepared failure; its path is taken relative to the record.
    pub fn report(&mut self, error: FieldError) {
        let FieldError {
            path,
            tag,
            param,
            value,
            message,
            ..
        } = error;
        let mut rebased = FieldError::new(self.path.join(&path), tag)
            .with_param(param)
            .with_kind(FailureKind::StructLevel);
        if let Some(value) = value {
            rebased = rebased.with_value(value);
        }
        if message != FieldError::new(path, rebased.tag.clone()).message {
            rebased = rebased.with_message(message);
        }
        self.errors.push(rebased);
    }

    /// Returns the number of failures reported so far.
    pub fn reported(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_error_on_nested_record() {
        let record = json!({"City": "", "Country": "ID"});
        let mut level = StructLevel::new(&record, FieldPath::from_field("Address"));

        level.report_error("City", "city_required", "");
        let errors = level.into_errors();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "Address.City");
        assert_eq!(errors[0].kind, FailureKind::StructLevel);
        assert_eq!(errors[0].value, Some(json!("")));
    }

    #[test]
    fn test_missing_field_reads_null() {
        let record = json!({});
        let level = StructLevel::new(&record, FieldPath::root());
        assert_eq!(level.field("Nope"), &Value::Null);
    }

    #[test]
    fn test_report_rebases_and_keeps_message() {
        let record = json!({"Total": 30});
        let mut level = StructLevel::new(&record, FieldPath::from_field("Order"));
        level.report(
            FieldError::new(FieldPath::from_field("Total"), "total")
                .with_message("total must equal quantity * unit_price"),
        );
        level.report(FieldError::new(FieldPath::root(), "order"));

        let errors = level.into_errors();
        assert_eq!(errors[0].path.to_string(), "Order.Total");
        assert_eq!(errors[0].message, "total must equal quantity * unit_price");
        assert_eq!(errors[1].path.to_string(), "Order");
        assert!(errors[1].message.contains("Struct validation"));
    }
}
