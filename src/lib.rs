//! # invoice-flow
//!
//! Australian GST-aware invoice and quote pipeline: normalization,
//! validation, and monetary computation.
//!
//! Loosely-structured input (JSON or free text) is validated against
//! versioned schemas and Australian compliance rules (ABN checksum, GST
//! disclosure thresholds), then normalized into a canonical document with
//! rounded monetary totals. All monetary values use
//! [`rust_decimal::Decimal`], never floating point.
//!
//! GST follows the AU-inclusive convention: line prices already contain
//! GST, which is extracted for disclosure as `lineTotal / 11`. The document
//! `total` therefore equals `subtotal` while `gstTotal` reports the
//! embedded tax.
//!
//! ## Quick Start
//!
//! ```rust
//! use invoice_flow::*;
//! use rust_decimal_macros::dec;
//! use serde_json::json;
//!
//! let profile: BusinessProfile = serde_json::from_value(json!({
//!     "legalName": "Aperture Studio Pty Ltd",
//!     "abn": "51824753556",
//!     "email": "billing@aperture.example",
//!     "phone": "+61 400 000 000",
//!     "address": "1 Example St, Sydney NSW 2000",
//!     "defaultTermsDays": 14,
//!     "payment": {
//!         "bankName": "Example Bank",
//!         "accountName": "Aperture Studio",
//!         "bsb": "000-000",
//!         "accountNumber": "12345678",
//!         "payId": "billing@aperture.example"
//!     }
//! })).unwrap();
//!
//! let input: InvoiceInput = serde_json::from_value(json!({
//!     "issueDate": "2024-06-01",
//!     "dueDate": "2024-06-15",
//!     "gstEnabled": true,
//!     "client": { "name": "Jane Doe", "address": "2 Sample Ave, Melbourne VIC" },
//!     "lineItems": [
//!         { "description": "Photography session", "quantity": 2, "unitPrice": 250 },
//!         { "description": "Prints", "quantity": 1, "unitPrice": 50, "taxable": false }
//!     ]
//! })).unwrap();
//!
//! let mut store = MemorySequenceStore::new();
//! let normalized = normalize_invoice(&profile, &input, None, &mut store).unwrap();
//!
//! assert_eq!(normalized.invoice_number, "INV-202406-001");
//! assert_eq!(normalized.invoice_label, InvoiceLabel::TaxInvoice);
//! assert_eq!(normalized.subtotal, dec!(550.00));
//! assert_eq!(normalized.gst_total, dec!(45.45));
//! assert_eq!(normalized.total, normalized.subtotal);
//! ```
//!
//! The full pipeline ([`process_invoice_input`]) reads a profile from disk,
//! validates both documents, and fails fast on the first error; the
//! combined-report path ([`validate_report`]) always returns every finding.

pub mod abn;
pub mod error;
pub mod input;
pub mod money;
pub mod normalize;
pub mod numbering;
pub mod pipeline;
pub mod profile;
pub mod schema;
pub mod types;
pub mod validation;

pub use abn::{is_valid_abn, sanitize_abn};
pub use error::*;
pub use input::{load_invoice_input, parse_bool_token, parse_text_invoice};
pub use money::{format_currency, gst_component, round_money};
pub use numbering::{
    FileSequenceStore, MemorySequenceStore, SequenceStore, next_document_number, sequence_key,
};
pub use normalize::normalize_invoice;
pub use pipeline::{
    DocumentRenderer, ProcessedInvoice, ValidationReport, process_invoice_input, validate_report,
};
pub use profile::{load_profile, load_profile_value};
pub use types::*;
pub use validation::{validate_invoice, validate_profile};
