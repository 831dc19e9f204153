use quill::ParameterMap;
use serde_json::Value;

/// Builds a parameter map from literal pairs.
pub fn params(pairs: &[(&str, Value)]) -> ParameterMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Initializes test logging once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
