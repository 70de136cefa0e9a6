//! Business profile loading with `${ENV_VAR}` substitution.
//!
//! Every string value in the profile JSON may reference host environment
//! variables as `${NAME}` (`A-Z`, `0-9`, `_`). Unset variables expand to
//! the empty string; anything that is not a well-formed reference is left
//! untouched.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::InvoiceFlowError;
use crate::types::BusinessProfile;

fn is_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn expand_str(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        match tail.find('}') {
            Some(end) if is_var_name(&tail[..end]) => {
                out.push_str(&lookup(&tail[..end]).unwrap_or_default());
                rest = &tail[end + 1..];
            }
            _ => {
                out.push_str("${");
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Recursively expand `${ENV_VAR}` references in every string value.
pub fn expand_env_with(value: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) {
    match value {
        Value::String(s) => *s = expand_str(s, lookup),
        Value::Array(items) => {
            for item in items {
                expand_env_with(item, lookup);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                expand_env_with(item, lookup);
            }
        }
        _ => {}
    }
}

/// Load a profile as raw JSON with environment substitution applied,
/// ready for schema validation.
pub fn load_profile_value(path: impl AsRef<Path>) -> Result<Value, InvoiceFlowError> {
    let raw = fs::read_to_string(path.as_ref())?;
    let mut value: Value = serde_json::from_str(&raw)?;
    expand_env_with(&mut value, &|name| std::env::var(name).ok());
    Ok(value)
}

/// Load and deserialize a profile. Prefer [`load_profile_value`] followed by
/// [`crate::validation::validate_profile`] when schema diagnostics matter.
pub fn load_profile(path: impl AsRef<Path>) -> Result<BusinessProfile, InvoiceFlowError> {
    Ok(serde_json::from_value(load_profile_value(path)?)?)
}
