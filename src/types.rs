use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version stamped on every normalized document.
pub const NORMALIZED_SCHEMA_VERSION: &str = "invoice-normalized-v1";

/// Document type. Determines numbering prefix, labels, and which
/// compliance rules apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Invoice,
    Quote,
}

impl DocumentType {
    /// Lowercase wire name, as used in sequence keys and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Quote => "quote",
        }
    }

    /// Document number prefix ("INV" / "QTE").
    pub fn number_prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "INV",
            Self::Quote => "QTE",
        }
    }
}

/// Banking and payment details of the issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub bank_name: String,
    pub account_name: String,
    /// Bank-State-Branch code (6 digits, conventionally "xxx-xxx").
    pub bsb: String,
    pub account_number: String,
    pub pay_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference_label: Option<String>,
}

/// The issuer's identity and payment details. Loaded once per run,
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    /// Trading name, if different from the legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub legal_name: String,
    /// Australian Business Number (11 digits, see [`crate::abn`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abn: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    /// Default currency for documents that do not override it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub default_terms_days: u32,
    pub payment: PaymentDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_footer: Option<String>,
    /// Override for the sequence counter store location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_state_path: Option<String>,
}

/// The billed party.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceClient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abn: Option<String>,
}

/// Free-form session metadata, passed through to the normalized document
/// unmodified. Unknown keys are preserved via `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSession {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoot_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A raw, user-supplied line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Whether GST applies to this line. Defaults to true during normalization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxable: Option<bool>,
}

/// Per-document payment overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Raw, user-supplied invoice or quote input. Mutable only during
/// parsing/defaulting; never mutated once normalization begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    /// Explicit document number; when absent one is allocated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// ISO date string (YYYY-MM-DD).
    pub issue_date: String,
    pub due_date: String,
    /// Quotes only; falls back to `due_date` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<InvoiceSession>,
    pub client: InvoiceClient,
    pub line_items: Vec<InvoiceLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentOverride>,
}

/// Rendered document heading, derived from type and GST disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceLabel {
    Invoice,
    #[serde(rename = "Tax Invoice")]
    TaxInvoice,
    Quote,
}

impl InvoiceLabel {
    /// Display text, as rendered on the document heading.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::TaxInvoice => "Tax Invoice",
            Self::Quote => "Quote",
        }
    }
}

/// Which secondary date the document displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateLabel {
    #[serde(rename = "Due Date")]
    DueDate,
    #[serde(rename = "Valid Until")]
    ValidUntil,
}

impl DateLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DueDate => "Due Date",
            Self::ValidUntil => "Valid Until",
        }
    }
}

/// A line item with resolved flags and computed monetary values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub taxable: bool,
    /// `round2(quantity × unitPrice)`.
    pub line_total: Decimal,
    /// `round2(lineTotal / 11)` when GST-enabled and taxable, else 0.
    pub gst_amount: Decimal,
}

/// The canonical normalized document. Created once per invocation and
/// never mutated afterward.
///
/// GST here is an inclusive disclosure: each `line_total` already contains
/// its GST component, so `total` equals `subtotal` while `gst_total` reports
/// the embedded tax (standard AU retail convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceNormalized {
    /// Always [`NORMALIZED_SCHEMA_VERSION`].
    pub schema_version: String,
    pub document_type: DocumentType,
    pub invoice_label: InvoiceLabel,
    pub date_label: DateLabel,
    pub date_value: String,
    pub invoice_number: String,
    pub issue_date: String,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    pub currency: String,
    pub gst_enabled: bool,
    pub client: InvoiceClient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<InvoiceSession>,
    pub line_items: Vec<NormalizedLineItem>,
    /// Sum of already-rounded line totals.
    pub subtotal: Decimal,
    /// Sum of already-rounded per-line GST amounts.
    pub gst_total: Decimal,
    /// Equals `subtotal`; GST is embedded in line totals, not added on top.
    pub total: Decimal,
    pub payment_reference: String,
    pub terms_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Where a loaded input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Json,
    Text,
}

/// An input document loaded from a path or literal, not yet validated.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    /// The candidate document as raw JSON, ready for schema validation.
    pub value: Value,
    /// The raw text as supplied.
    pub raw: String,
    pub source: InputSource,
}
