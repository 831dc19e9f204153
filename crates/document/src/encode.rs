//! The process-wide scalar-encoding hook.
//!
//! Hosting applications sometimes need substituted scalars coerced on
//! their way into a document (an enum rendered by name, say). The hook
//! is installed once during process setup and consulted on every
//! scalar splice; installation is guarded so that constructing parsers
//! concurrently can never race it.
use serde_json::Value;
use std::sync::OnceLock;

/// A hook mapping a scalar about to be spliced into a document.
/// Returning `None` keeps the scalar as-is.
pub type ScalarEncoder = fn(&Value) -> Option<Value>;

static SCALAR_ENCODER: OnceLock<ScalarEncoder> = OnceLock::new();

/// Installs the process-wide scalar encoder. The first install wins;
/// later calls are no-ops and return `false`.
pub fn install_scalar_encoder(encoder: ScalarEncoder) -> bool {
    SCALAR_ENCODER.set(encoder).is_ok()
}

/// Runs a substituted value through the installed hook. Containers
/// pass through untouched; the hook sees scalars only.
pub(crate) fn encode_scalar(value: Value) -> Value {
    if value.is_object() || value.is_array() {
        return value;
    }
    match SCALAR_ENCODER.get() {
        Some(encode) => encode(&value).unwrap_or(value),
        None => value,
    }
}
