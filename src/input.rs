//! Loading and parsing of invoice/quote input.
//!
//! Input arrives as a file path or a literal string, containing either JSON
//! matching the invoice schema or semi-structured free text:
//!
//! ```text
//! client: Jane Doe
//! gst: yes
//! - Photography session | 2 | 250 | true
//! - Travel | 1 | 80 | no
//! ```
//!
//! Lines starting with `-` and containing `|` are line items
//! (`description | qty | unitPrice | [taxable]`); all other `key: value`
//! lines populate a field map. Field order is free; line-item order is kept.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::InvoiceFlowError;
use crate::types::{
    DocumentType, InputSource, InvoiceClient, InvoiceInput, InvoiceLineItem, InvoiceSession,
    LoadedInput, PaymentOverride,
};

/// Tri-state boolean lexer for text fields: `true/yes/y/on` and
/// `false/no/n/off` (case-insensitive); anything else is `None` and the
/// caller applies its policy default.
pub fn parse_bool_token(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" => Some(true),
        "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn parse_money_field(raw: &str, line: &str) -> Result<Decimal, InvoiceFlowError> {
    raw.parse().map_err(|_| {
        InvoiceFlowError::InputParse(format!(
            "Could not parse '{raw}' as a number in line item '{line}'."
        ))
    })
}

/// Parse semi-structured free text into the same shape as JSON input.
pub fn parse_text_invoice(raw: &str) -> Result<InvoiceInput, InvoiceFlowError> {
    let mut line_items: Vec<InvoiceLineItem> = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with('-') && line.contains('|') {
            let parts: Vec<&str> = line[1..].split('|').map(str::trim).collect();
            if parts.len() >= 3 {
                line_items.push(InvoiceLineItem {
                    description: parts[0].to_string(),
                    quantity: parse_money_field(parts[1], line)?,
                    unit_price: parse_money_field(parts[2], line)?,
                    taxable: Some(
                        parts
                            .get(3)
                            .filter(|t| !t.is_empty())
                            .and_then(|t| parse_bool_token(t))
                            .unwrap_or(true),
                    ),
                });
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            if !key.trim().is_empty() {
                fields.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }
    }

    if line_items.is_empty() {
        return Err(InvoiceFlowError::InputParse(
            "Could not parse line items from text. Use JSON input or text lines like \
             '- Description | 1 | 500 | true'."
                .to_string(),
        ));
    }

    let issue_date = fields
        .get("issue date")
        .or_else(|| fields.get("issued"))
        .cloned()
        .unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());
    let due_date = fields.get("due date").cloned().unwrap_or_else(|| issue_date.clone());
    let document_type = if fields.get("type").map(String::as_str) == Some("quote") {
        DocumentType::Quote
    } else {
        DocumentType::Invoice
    };

    let session_type = fields.get("session type").cloned();
    let shoot_date = fields.get("shoot date").cloned();
    let location = fields.get("location").cloned();
    let session = if session_type.is_some() || shoot_date.is_some() || location.is_some() {
        Some(InvoiceSession {
            session_type,
            shoot_date,
            location,
            extra: serde_json::Map::new(),
        })
    } else {
        None
    };

    let reference = fields.get("payment reference").cloned();
    let terms_days = fields.get("terms days").and_then(|v| v.parse().ok());
    let payment = if reference.is_some() || terms_days.is_some() {
        Some(PaymentOverride { terms_days, reference })
    } else {
        None
    };

    Ok(InvoiceInput {
        document_type: Some(document_type),
        invoice_number: fields.get("invoice number").cloned(),
        issue_date,
        due_date,
        valid_until: fields.get("valid until").cloned(),
        currency: Some(fields.get("currency").cloned().unwrap_or_else(|| "AUD".to_string())),
        gst_enabled: Some(
            fields
                .get("gst")
                .and_then(|v| parse_bool_token(v))
                .unwrap_or(false),
        ),
        session,
        client: InvoiceClient {
            name: fields
                .get("client")
                .or_else(|| fields.get("client name"))
                .cloned()
                .unwrap_or_else(|| "Client".to_string()),
            email: fields.get("client email").cloned(),
            phone: fields.get("client phone").cloned(),
            address: fields.get("client address").cloned(),
            abn: fields.get("client abn").cloned(),
        },
        line_items,
        notes: fields.get("notes").cloned(),
        payment,
    })
}

/// True when the argument plausibly names an existing file rather than a
/// literal document: single-line, not a JSON object, and present on disk.
pub fn is_likely_path(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() || input.contains('\n') || trimmed.starts_with('{') {
        return false;
    }
    Path::new(trimmed).exists()
}

/// Resolve a path-or-literal argument to its content.
pub fn read_file_or_literal(input_arg: &str) -> Result<String, InvoiceFlowError> {
    if is_likely_path(input_arg) {
        Ok(fs::read_to_string(input_arg.trim())?)
    } else {
        Ok(input_arg.to_string())
    }
}

/// Load an input document: JSON first, free-text grammar as the fallback.
pub fn load_invoice_input(input_arg: &str) -> Result<LoadedInput, InvoiceFlowError> {
    let raw = read_file_or_literal(input_arg)?;

    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => Ok(LoadedInput {
            value,
            raw,
            source: InputSource::Json,
        }),
        Err(_) => {
            let input = parse_text_invoice(&raw)?;
            let value = serde_json::to_value(&input)?;
            Ok(LoadedInput {
                value,
                raw,
                source: InputSource::Text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn bool_lexer_tri_state() {
        for token in ["true", "yes", "y", "on", "Yes", "Y", "ON"] {
            assert_eq!(parse_bool_token(token), Some(true), "{token}");
        }
        for token in ["false", "no", "n", "off", "No", "OFF"] {
            assert_eq!(parse_bool_token(token), Some(false), "{token}");
        }
        for token in ["", "maybe", "1", "oui"] {
            assert_eq!(parse_bool_token(token), None, "{token}");
        }
    }

    #[test]
    fn parses_single_line_item() {
        let input = parse_text_invoice("- Photography session | 2 | 250 | true").unwrap();
        assert_eq!(input.line_items.len(), 1);
        let item = &input.line_items[0];
        assert_eq!(item.description, "Photography session");
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit_price, dec!(250));
        assert_eq!(item.taxable, Some(true));
    }

    #[test]
    fn taxable_defaults_true_when_absent_or_unrecognized() {
        let input = parse_text_invoice("- A | 1 | 10\n- B | 1 | 10 | maybe\n- C | 1 | 10 | off")
            .unwrap();
        assert_eq!(input.line_items[0].taxable, Some(true));
        assert_eq!(input.line_items[1].taxable, Some(true));
        assert_eq!(input.line_items[2].taxable, Some(false));
    }

    #[test]
    fn field_lines_populate_defaults() {
        let text = "\
type: quote
client: Jane Doe
client email: jane@example.com
issue date: 2024-06-01
valid until: 2024-07-01
gst: yes
terms days: 14
- Session | 1 | 500";
        let input = parse_text_invoice(text).unwrap();
        assert_eq!(input.document_type, Some(DocumentType::Quote));
        assert_eq!(input.client.name, "Jane Doe");
        assert_eq!(input.client.email.as_deref(), Some("jane@example.com"));
        assert_eq!(input.issue_date, "2024-06-01");
        assert_eq!(input.due_date, "2024-06-01"); // defaults to issue date
        assert_eq!(input.valid_until.as_deref(), Some("2024-07-01"));
        assert_eq!(input.gst_enabled, Some(true));
        assert_eq!(input.payment.as_ref().unwrap().terms_days, Some(14));
        assert_eq!(input.currency.as_deref(), Some("AUD"));
    }

    #[test]
    fn defaults_without_fields() {
        let input = parse_text_invoice("- Session | 1 | 500").unwrap();
        assert_eq!(input.document_type, Some(DocumentType::Invoice));
        assert_eq!(input.client.name, "Client");
        assert_eq!(input.gst_enabled, Some(false));
        assert!(input.session.is_none());
        assert!(input.payment.is_none());
        // issue date falls back to today (ISO, no time)
        assert_eq!(input.issue_date.len(), 10);
        assert_eq!(input.due_date, input.issue_date);
    }

    #[test]
    fn no_line_items_is_an_error() {
        let err = parse_text_invoice("client: Jane\nnotes: nothing billable").unwrap_err();
        assert!(err.to_string().contains("Use JSON input"));
    }

    #[test]
    fn items_need_three_parts() {
        // two parts: not a line item, and nothing else qualifies
        assert!(parse_text_invoice("- Session | 2").is_err());
    }

    #[test]
    fn json_input_loads_as_json() {
        let loaded = load_invoice_input(r#"{"issueDate": "2024-06-01"}"#).unwrap();
        assert_eq!(loaded.source, InputSource::Json);
        assert_eq!(loaded.value["issueDate"], "2024-06-01");
    }

    #[test]
    fn text_input_loads_as_text() {
        let loaded = load_invoice_input("client: Jane\n- Session | 1 | 500").unwrap();
        assert_eq!(loaded.source, InputSource::Text);
        assert_eq!(loaded.value["client"]["name"], "Jane");
        assert_eq!(loaded.value["lineItems"][0]["description"], "Session");
    }
}
