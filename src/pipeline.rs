//! The processing pipeline: load profile → validate profile → load input →
//! validate input → normalize.
//!
//! Two entrypoints with different failure policies:
//!
//! - [`process_invoice_input`] fails fast on the first validation error at
//!   each stage (profile checked before invoice) and produces no partial
//!   output.
//! - [`validate_report`] never fails fast on validation; it always returns
//!   the full combined report for both profile and invoice, leaving
//!   pass/fail interpretation to the caller.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{InvoiceFlowError, ValidationResult};
use crate::input::load_invoice_input;
use crate::normalize::normalize_invoice;
use crate::numbering::FileSequenceStore;
use crate::profile::load_profile_value;
use crate::types::{BusinessProfile, DocumentType, InvoiceInput, InvoiceNormalized};
use crate::validation::{validate_invoice, validate_profile};

/// Result of a successful end-to-end run.
#[derive(Debug, Clone)]
pub struct ProcessedInvoice {
    pub profile: BusinessProfile,
    pub normalized: InvoiceNormalized,
    pub validation: ValidationResult,
}

/// Combined validation report for the non-fail-fast path.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub profile: ValidationResult,
    pub invoice: ValidationResult,
}

impl ValidationReport {
    /// True iff both sides validated cleanly.
    pub fn valid(&self) -> bool {
        self.profile.valid && self.invoice.valid
    }
}

/// Rendering boundary: turns a profile and a normalized document into a
/// renderable artifact. HTML, CSS, and PDF mechanics live behind this trait,
/// outside the core.
pub trait DocumentRenderer {
    type Output;

    fn render(
        &self,
        profile: &BusinessProfile,
        normalized: &InvoiceNormalized,
    ) -> Result<Self::Output, InvoiceFlowError>;
}

fn stamp_document_type(value: &mut Value, forced: Option<DocumentType>) {
    if let (Some(doc_type), Some(object)) = (forced, value.as_object_mut()) {
        object.insert(
            "documentType".to_string(),
            Value::String(doc_type.as_str().to_string()),
        );
    }
}

/// Run the full pipeline, failing fast on the first validation error.
pub fn process_invoice_input(
    input_arg: &str,
    profile_path: impl AsRef<Path>,
    forced_type: Option<DocumentType>,
) -> Result<ProcessedInvoice, InvoiceFlowError> {
    let profile_value = load_profile_value(profile_path)?;
    let profile_validation = validate_profile(&profile_value);
    if let Some(first) = profile_validation.first_error() {
        return Err(InvoiceFlowError::InvalidProfile {
            code: first.code.clone(),
            message: first.message.clone(),
        });
    }
    let profile: BusinessProfile = serde_json::from_value(profile_value.clone())?;

    let mut loaded = load_invoice_input(input_arg)?;
    stamp_document_type(&mut loaded.value, forced_type);
    debug!(source = ?loaded.source, "loaded document input");

    let validation = validate_invoice(&profile_value, &loaded.value);
    if let Some(first) = validation.first_error() {
        return Err(InvoiceFlowError::InvalidInput {
            code: first.code.clone(),
            message: first.message.clone(),
        });
    }

    let input: InvoiceInput = serde_json::from_value(loaded.value)?;
    let mut store = FileSequenceStore::from_profile_path(profile.sequence_state_path.as_deref());
    let normalized = normalize_invoice(&profile, &input, forced_type, &mut store)?;

    Ok(ProcessedInvoice {
        profile,
        normalized,
        validation,
    })
}

/// Validate profile and input without failing fast; errors are returned
/// only for unreadable files, never for validation findings.
pub fn validate_report(
    input_arg: &str,
    profile_path: impl AsRef<Path>,
    forced_type: Option<DocumentType>,
) -> Result<ValidationReport, InvoiceFlowError> {
    let profile_value = load_profile_value(profile_path)?;
    let profile = validate_profile(&profile_value);

    let mut loaded = load_invoice_input(input_arg)?;
    stamp_document_type(&mut loaded.value, forced_type);
    let invoice = validate_invoice(&profile_value, &loaded.value);

    Ok(ValidationReport { profile, invoice })
}
