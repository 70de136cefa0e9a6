//! Structural validation against the versioned document schemas.
//!
//! The profile and invoice schemas are draft 2020-12 JSON Schema documents
//! embedded from `schemas/`. Each violation becomes one ordered
//! [`ValidationMessage`] whose code is derived from the violated constraint
//! keyword (`SCHEMA_REQUIRED`, `SCHEMA_MINITEMS`, …) and whose path is the
//! instance pointer (`/` for the document root).

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ValidationMessage;

static PROFILE_SCHEMA: Lazy<JSONSchema> =
    Lazy::new(|| compile(include_str!("../schemas/profile.schema.v1.json")));

static INVOICE_SCHEMA: Lazy<JSONSchema> =
    Lazy::new(|| compile(include_str!("../schemas/invoice.schema.v1.json")));

fn compile(raw: &str) -> JSONSchema {
    let schema: Value = serde_json::from_str(raw).expect("embedded schema is valid JSON");
    JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .compile(&schema)
        .expect("embedded schema compiles")
}

/// Validate a candidate profile document.
pub fn check_profile(candidate: &Value) -> Vec<ValidationMessage> {
    check(&PROFILE_SCHEMA, candidate)
}

/// Validate a candidate invoice/quote document.
pub fn check_invoice(candidate: &Value) -> Vec<ValidationMessage> {
    check(&INVOICE_SCHEMA, candidate)
}

fn check(schema: &JSONSchema, candidate: &Value) -> Vec<ValidationMessage> {
    match schema.validate(candidate) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|err| {
                let path = err.instance_path.to_string();
                ValidationMessage::error(
                    format!("SCHEMA_{}", constraint_keyword(&err.kind)),
                    err.to_string(),
                )
                .at(if path.is_empty() { "/".to_string() } else { path })
            })
            .collect(),
    }
}

/// Upper-cased schema keyword behind a violation, mirroring how ajv-style
/// validators report the failed constraint.
fn constraint_keyword(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::AdditionalItems { .. } => "ADDITIONALITEMS",
        ValidationErrorKind::AdditionalProperties { .. } => "ADDITIONALPROPERTIES",
        ValidationErrorKind::AnyOf => "ANYOF",
        ValidationErrorKind::Constant { .. } => "CONST",
        ValidationErrorKind::Contains => "CONTAINS",
        ValidationErrorKind::Enum { .. } => "ENUM",
        ValidationErrorKind::ExclusiveMaximum { .. } => "EXCLUSIVEMAXIMUM",
        ValidationErrorKind::ExclusiveMinimum { .. } => "EXCLUSIVEMINIMUM",
        ValidationErrorKind::FalseSchema => "FALSESCHEMA",
        ValidationErrorKind::Format { .. } => "FORMAT",
        ValidationErrorKind::MaxItems { .. } => "MAXITEMS",
        ValidationErrorKind::Maximum { .. } => "MAXIMUM",
        ValidationErrorKind::MaxLength { .. } => "MAXLENGTH",
        ValidationErrorKind::MaxProperties { .. } => "MAXPROPERTIES",
        ValidationErrorKind::MinItems { .. } => "MINITEMS",
        ValidationErrorKind::Minimum { .. } => "MINIMUM",
        ValidationErrorKind::MinLength { .. } => "MINLENGTH",
        ValidationErrorKind::MinProperties { .. } => "MINPROPERTIES",
        ValidationErrorKind::MultipleOf { .. } => "MULTIPLEOF",
        ValidationErrorKind::Not { .. } => "NOT",
        ValidationErrorKind::OneOfMultipleValid => "ONEOF",
        ValidationErrorKind::OneOfNotValid => "ONEOF",
        ValidationErrorKind::Pattern { .. } => "PATTERN",
        ValidationErrorKind::PropertyNames { .. } => "PROPERTYNAMES",
        ValidationErrorKind::Required { .. } => "REQUIRED",
        ValidationErrorKind::Type { .. } => "TYPE",
        ValidationErrorKind::UniqueItems => "UNIQUEITEMS",
        _ => "VALIDATION",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_violations_point_at_slash() {
        let messages = check_invoice(&json!("not even an object"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "SCHEMA_TYPE");
        assert_eq!(messages[0].path.as_deref(), Some("/"));
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let messages = check_invoice(&json!({ "client": { "name": "Jane" } }));
        assert!(
            messages.iter().any(|m| m.code == "SCHEMA_REQUIRED"),
            "{messages:?}"
        );
    }

    #[test]
    fn empty_line_items_violate_min_items() {
        let messages = check_invoice(&json!({
            "issueDate": "2024-06-01",
            "dueDate": "2024-06-15",
            "client": { "name": "Jane" },
            "lineItems": []
        }));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "SCHEMA_MINITEMS");
        assert_eq!(messages[0].path.as_deref(), Some("/lineItems"));
    }

    #[test]
    fn date_format_is_enforced() {
        let messages = check_invoice(&json!({
            "issueDate": "June 1st",
            "dueDate": "2024-06-15",
            "client": { "name": "Jane" },
            "lineItems": [{ "description": "x", "quantity": 1, "unitPrice": 10 }]
        }));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "SCHEMA_FORMAT");
        assert_eq!(messages[0].path.as_deref(), Some("/issueDate"));
    }

    #[test]
    fn valid_documents_produce_no_messages() {
        let messages = check_invoice(&json!({
            "documentType": "invoice",
            "issueDate": "2024-06-01",
            "dueDate": "2024-06-15",
            "gstEnabled": true,
            "client": { "name": "Jane" },
            "lineItems": [{ "description": "x", "quantity": 2, "unitPrice": 250 }]
        }));
        assert!(messages.is_empty(), "{messages:?}");
    }
}
