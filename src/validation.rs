//! Profile and invoice validation: structural checks first, then the
//! Australian compliance rules.
//!
//! Schema errors short-circuit the compliance rules; they never run on a
//! structurally invalid document. The compliance rules themselves are
//! independent and all evaluated. Compliance flags are informational
//! provenance tags, always emitted regardless of pass/fail.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::abn::is_valid_abn;
use crate::error::{ValidationMessage, ValidationResult};
use crate::schema;
use crate::types::{DocumentType, InvoiceInput};

/// GST-enabled tax invoices at or above this gross amount must identify
/// the recipient (ATO requirement for tax invoices of AUD 1,000+).
const BUYER_DETAILS_THRESHOLD: Decimal = dec!(1000);

/// Validate a business profile document against its schema.
pub fn validate_profile(profile: &Value) -> ValidationResult {
    let messages = schema::check_profile(profile);
    ValidationResult::from_messages(messages, Vec::new())
}

/// Validate an invoice/quote document: schema, then compliance rules.
///
/// The profile is consulted for the seller ABN; it may itself be invalid
/// (the combined-report path validates both sides independently).
pub fn validate_invoice(profile: &Value, invoice: &Value) -> ValidationResult {
    let mut messages = schema::check_invoice(invoice);

    if messages.is_empty() {
        if let Ok(input) = serde_json::from_value::<InvoiceInput>(invoice.clone()) {
            // A blank ABN counts as absent, not as a malformed one.
            let seller_abn = profile
                .get("abn")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty());
            messages.extend(compliance_checks(seller_abn, &input));
        }
    }

    let gst_enabled = invoice
        .get("gstEnabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let is_quote = invoice.get("documentType").and_then(Value::as_str) == Some("quote");
    let compliance_flags = vec![
        if gst_enabled {
            "GST_OPTION_ENABLED".to_string()
        } else {
            "GST_OPTION_DISABLED".to_string()
        },
        if is_quote {
            "AU_QUOTE_RULES_V1".to_string()
        } else {
            "AU_INVOICE_RULES_V1".to_string()
        },
    ];

    ValidationResult::from_messages(messages, compliance_flags)
}

/// Australian compliance rules. Each rule is independent; all are evaluated.
fn compliance_checks(seller_abn: Option<&str>, invoice: &InvoiceInput) -> Vec<ValidationMessage> {
    let mut checks = Vec::new();
    let document_type = invoice.document_type.unwrap_or_default();
    let gst_enabled = invoice.gst_enabled.unwrap_or(false);

    // Blank optional client fields count as absent throughout.
    let client_abn = invoice
        .client
        .abn
        .as_deref()
        .filter(|s| !s.trim().is_empty());
    let client_address = invoice
        .client
        .address
        .as_deref()
        .filter(|s| !s.trim().is_empty());

    if let Some(abn) = seller_abn {
        if !is_valid_abn(abn) {
            checks.push(
                ValidationMessage::warning(
                    "INVALID_SELLER_ABN_FORMAT",
                    "Business profile ABN does not pass checksum validation.",
                )
                .at("/abn"),
            );
        }
    }

    if let Some(abn) = client_abn {
        if !is_valid_abn(abn) {
            checks.push(
                ValidationMessage::warning(
                    "INVALID_CLIENT_ABN_FORMAT",
                    "Client ABN does not pass checksum validation.",
                )
                .at("/client/abn"),
            );
        }
    }

    // The remaining rules apply to GST-enabled tax invoices only, not quotes.
    if document_type == DocumentType::Invoice && gst_enabled {
        if seller_abn.is_none() {
            checks.push(
                ValidationMessage::error(
                    "MISSING_SELLER_ABN",
                    "GST-enabled invoices should include seller ABN.",
                )
                .at("/abn"),
            );
        }

        // Unrounded gross estimate, taxable flag ignored. Schema-valid
        // amounts can still overflow the product; saturate rather than
        // panic, which keeps the threshold comparison meaningful.
        let gross_estimate = invoice.line_items.iter().fold(Decimal::ZERO, |acc, item| {
            item.quantity
                .checked_mul(item.unit_price)
                .and_then(|amount| acc.checked_add(amount))
                .unwrap_or(Decimal::MAX)
        });
        if gross_estimate >= BUYER_DETAILS_THRESHOLD {
            let has_identity = !invoice.client.name.trim().is_empty();
            let has_address_or_abn = client_address.is_some() || client_abn.is_some();
            if !has_identity || !has_address_or_abn {
                checks.push(
                    ValidationMessage::error(
                        "MISSING_BUYER_DETAILS_FOR_1000_PLUS",
                        "GST-enabled tax invoices for totals >= AUD 1,000 must include \
                         recipient identity and address or ABN.",
                    )
                    .at("/client"),
                );
            }
        }
    }

    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_with_abn() -> Value {
        json!({ "abn": "51824753556" })
    }

    fn invoice_value(gst: bool, line_total: i64) -> Value {
        json!({
            "documentType": "invoice",
            "issueDate": "2024-06-01",
            "dueDate": "2024-06-15",
            "gstEnabled": gst,
            "client": { "name": "Jane" },
            "lineItems": [{ "description": "Session", "quantity": 1, "unitPrice": line_total }]
        })
    }

    #[test]
    fn schema_errors_short_circuit_compliance() {
        // No seller ABN and GST enabled would be a compliance error, but the
        // structurally broken document reports only schema messages.
        let result = validate_invoice(&json!({}), &json!({ "gstEnabled": true }));
        assert!(!result.valid);
        assert!(result.errors.iter().all(|m| m.code.starts_with("SCHEMA_")));
    }

    #[test]
    fn flags_are_always_emitted() {
        let result = validate_invoice(&json!({}), &json!({ "documentType": "quote" }));
        assert!(!result.valid);
        assert_eq!(
            result.compliance_flags,
            vec!["GST_OPTION_DISABLED", "AU_QUOTE_RULES_V1"]
        );

        let result = validate_invoice(&profile_with_abn(), &invoice_value(true, 100));
        assert!(result.valid);
        assert_eq!(
            result.compliance_flags,
            vec!["GST_OPTION_ENABLED", "AU_INVOICE_RULES_V1"]
        );
    }

    #[test]
    fn missing_seller_abn_is_an_error_for_gst_invoices() {
        let result = validate_invoice(&json!({}), &invoice_value(true, 100));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "MISSING_SELLER_ABN");
        assert_eq!(result.errors[0].path.as_deref(), Some("/abn"));
    }

    #[test]
    fn no_seller_abn_needed_without_gst() {
        let result = validate_invoice(&json!({}), &invoice_value(false, 100));
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn bad_seller_abn_is_a_warning_not_an_error() {
        let profile = json!({ "abn": "11111111111" });
        let result = validate_invoice(&profile, &invoice_value(true, 100));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, "INVALID_SELLER_ABN_FORMAT");
    }

    #[test]
    fn bad_client_abn_is_a_warning() {
        let mut invoice = invoice_value(false, 100);
        invoice["client"]["abn"] = json!("12345678901");
        let result = validate_invoice(&profile_with_abn(), &invoice);
        assert!(result.valid);
        assert_eq!(result.warnings[0].code, "INVALID_CLIENT_ABN_FORMAT");
        assert_eq!(result.warnings[0].path.as_deref(), Some("/client/abn"));
    }

    #[test]
    fn big_gst_invoice_needs_buyer_details() {
        let result = validate_invoice(&profile_with_abn(), &invoice_value(true, 1000));
        assert!(!result.valid);
        assert_eq!(result.errors[0].code, "MISSING_BUYER_DETAILS_FOR_1000_PLUS");
    }

    #[test]
    fn buyer_address_satisfies_the_1000_rule() {
        let mut invoice = invoice_value(true, 1500);
        invoice["client"]["address"] = json!("1 Example St, Sydney NSW");
        let result = validate_invoice(&profile_with_abn(), &invoice);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn quotes_are_exempt_from_invoice_only_rules() {
        let mut quote = invoice_value(true, 5000);
        quote["documentType"] = json!("quote");
        // No seller ABN, big total, client without address. Still fine.
        let result = validate_invoice(&json!({}), &quote);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn gross_estimate_is_unrounded_and_ignores_taxable() {
        // 3 × 333.34 = 1000.02 ≥ 1000 even though each line rounds lower.
        let invoice = json!({
            "documentType": "invoice",
            "issueDate": "2024-06-01",
            "dueDate": "2024-06-15",
            "gstEnabled": true,
            "client": { "name": "Jane" },
            "lineItems": [
                { "description": "a", "quantity": 3, "unitPrice": 333.34, "taxable": false }
            ]
        });
        let result = validate_invoice(&profile_with_abn(), &invoice);
        assert!(
            result
                .errors
                .iter()
                .any(|m| m.code == "MISSING_BUYER_DETAILS_FOR_1000_PLUS"),
            "{:?}",
            result.errors
        );
    }

    #[test]
    fn empty_seller_abn_counts_as_missing() {
        let profile = json!({ "abn": "" });
        let result = validate_invoice(&profile, &invoice_value(true, 100));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "MISSING_SELLER_ABN");
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn blank_buyer_details_do_not_satisfy_the_1000_rule() {
        let mut invoice = invoice_value(true, 2000);
        invoice["client"]["address"] = json!("");
        invoice["client"]["abn"] = json!("  ");
        let result = validate_invoice(&profile_with_abn(), &invoice);
        assert!(!result.valid);
        assert_eq!(result.errors[0].code, "MISSING_BUYER_DETAILS_FOR_1000_PLUS");
        // A blank client ABN is absent, not malformed.
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn gross_estimate_overflow_saturates_instead_of_failing() {
        let invoice = json!({
            "documentType": "invoice",
            "issueDate": "2024-06-01",
            "dueDate": "2024-06-15",
            "gstEnabled": true,
            "client": { "name": "Jane" },
            "lineItems": [
                { "description": "a", "quantity": 1e20, "unitPrice": 1e20 }
            ]
        });
        let result = validate_invoice(&profile_with_abn(), &invoice);
        assert!(!result.valid);
        assert!(
            result
                .errors
                .iter()
                .any(|m| m.code == "MISSING_BUYER_DETAILS_FOR_1000_PLUS"),
            "{:?}",
            result.errors
        );
    }

    #[test]
    fn all_compliance_rules_evaluate_independently() {
        let profile = json!({ "abn": "99999999999" });
        let mut invoice = invoice_value(true, 2000);
        invoice["client"]["abn"] = json!("22222222222");
        let result = validate_invoice(&profile, &invoice);

        // Bad seller ABN (warning), bad client ABN (warning); the client ABN
        // still counts as "address or ABN" for the 1000+ rule, format aside.
        assert_eq!(result.warnings.len(), 2);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn severity_is_serialized_lowercase() {
        let result = validate_invoice(&json!({}), &invoice_value(true, 100));
        let report = serde_json::to_value(&result).unwrap();
        assert_eq!(report["errors"][0]["severity"], "error");
        assert_eq!(report["valid"], false);
    }
}
