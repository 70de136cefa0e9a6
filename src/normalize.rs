//! The normalizer / money engine: resolves defaults, computes rounded
//! monetary values, and emits the canonical normalized document.
//!
//! Every defaultable field resolves explicit request value → profile
//! default → hard-coded fallback. Number allocation is the only side
//! effect, and only when no explicit number was supplied.

use rust_decimal::Decimal;

use crate::error::InvoiceFlowError;
use crate::money::{gst_component, round_money};
use crate::numbering::{SequenceStore, next_document_number};
use crate::types::{
    BusinessProfile, DateLabel, DocumentType, InvoiceInput, InvoiceLabel, InvoiceNormalized,
    NORMALIZED_SCHEMA_VERSION, NormalizedLineItem,
};

/// Fallback currency when neither input nor profile specify one.
const DEFAULT_CURRENCY: &str = "AUD";

fn checked_sum(
    mut values: impl Iterator<Item = Decimal>,
    field: &str,
) -> Result<Decimal, InvoiceFlowError> {
    values
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .ok_or_else(|| InvoiceFlowError::AmountOverflow(field.to_string()))
}

/// Normalize a validated input into the canonical document.
///
/// Pure apart from number allocation: when `invoice.invoice_number` is
/// absent, one counter value is consumed from `store` (no rollback if the
/// caller later fails).
pub fn normalize_invoice(
    profile: &BusinessProfile,
    invoice: &InvoiceInput,
    forced_type: Option<DocumentType>,
    store: &mut dyn SequenceStore,
) -> Result<InvoiceNormalized, InvoiceFlowError> {
    let document_type = forced_type
        .or(invoice.document_type)
        .unwrap_or_default();
    let gst_enabled = invoice.gst_enabled.unwrap_or(false);
    let currency = invoice
        .currency
        .clone()
        .or_else(|| profile.currency.clone())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let invoice_number = match &invoice.invoice_number {
        Some(number) => number.clone(),
        None => next_document_number(&invoice.issue_date, document_type, store)?,
    };

    let line_items: Vec<NormalizedLineItem> = invoice
        .line_items
        .iter()
        .map(|item| {
            let taxable = item.taxable.unwrap_or(true);
            let gross = item
                .quantity
                .checked_mul(item.unit_price)
                .ok_or_else(|| InvoiceFlowError::AmountOverflow(item.description.clone()))?;
            let line_total = round_money(gross);
            let gst_amount = if gst_enabled && taxable {
                gst_component(line_total)
            } else {
                Decimal::ZERO
            };
            Ok(NormalizedLineItem {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                taxable,
                line_total,
                gst_amount,
            })
        })
        .collect::<Result<_, InvoiceFlowError>>()?;

    // Sums of already-rounded line values, not round-after-sum.
    let subtotal = round_money(checked_sum(line_items.iter().map(|i| i.line_total), "subtotal")?);
    let gst_total = round_money(checked_sum(line_items.iter().map(|i| i.gst_amount), "gstTotal")?);

    let (invoice_label, date_label, date_value) = match document_type {
        DocumentType::Quote => (
            InvoiceLabel::Quote,
            DateLabel::ValidUntil,
            invoice
                .valid_until
                .clone()
                .unwrap_or_else(|| invoice.due_date.clone()),
        ),
        DocumentType::Invoice => (
            if gst_enabled {
                InvoiceLabel::TaxInvoice
            } else {
                InvoiceLabel::Invoice
            },
            DateLabel::DueDate,
            invoice.due_date.clone(),
        ),
    };

    let payment = invoice.payment.clone().unwrap_or_default();

    Ok(InvoiceNormalized {
        schema_version: NORMALIZED_SCHEMA_VERSION.to_string(),
        document_type,
        invoice_label,
        date_label,
        date_value,
        invoice_number: invoice_number.clone(),
        issue_date: invoice.issue_date.clone(),
        due_date: invoice.due_date.clone(),
        valid_until: invoice.valid_until.clone(),
        currency,
        gst_enabled,
        client: invoice.client.clone(),
        session: invoice.session.clone(),
        line_items,
        subtotal,
        gst_total,
        // GST is embedded in each line total; it is disclosed, not added.
        total: subtotal,
        payment_reference: payment.reference.unwrap_or(invoice_number),
        terms_days: payment.terms_days.unwrap_or(profile.default_terms_days),
        notes: invoice.notes.clone(),
    })
}
