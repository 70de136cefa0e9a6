use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading, validating, or normalizing a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceFlowError {
    /// Reading a profile, input file, or sequence state failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Free-text input could not be parsed into line items.
    #[error("{0}")]
    InputParse(String),

    /// The business profile failed schema validation.
    #[error("Invalid profile: {code} {message}")]
    InvalidProfile { code: String, message: String },

    /// The invoice/quote input failed validation.
    #[error("Invalid document input: {code} {message}")]
    InvalidInput { code: String, message: String },

    /// A monetary computation exceeded the representable range.
    #[error("Monetary amount out of range for {0}")]
    AmountOverflow(String),
}

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding with a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Stable code, e.g. "SCHEMA_REQUIRED" or "MISSING_SELLER_ABN".
    pub code: String,
    /// Human-readable description.
    pub message: String,
    pub severity: Severity,
    /// JSON-pointer-like path to the offending field ("/" for the document root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationMessage {
    /// Create an error-severity message without a path.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: Severity::Error,
            path: None,
        }
    }

    /// Create a warning-severity message without a path.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: Severity::Warning,
            path: None,
        }
    }

    /// Attach a document path.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.code, path, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Outcome of a single validation call.
///
/// Produced fresh per call and never mutated afterward. Callers combine
/// multiple results structurally (e.g. profile result + invoice result).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
    pub compliance_flags: Vec<String>,
}

impl ValidationResult {
    /// Split a flat message list by severity; `valid` iff no errors remain.
    pub fn from_messages(
        messages: Vec<ValidationMessage>,
        compliance_flags: Vec<String>,
    ) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for msg in messages {
            match msg.severity {
                Severity::Error => errors.push(msg),
                Severity::Warning => warnings.push(msg),
            }
        }
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            compliance_flags,
        }
    }

    /// First error in document order, if any.
    pub fn first_error(&self) -> Option<&ValidationMessage> {
        self.errors.first()
    }
}
