use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed document text: {message}")]
    Syntax { message: String },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Reserved for a future strict substitution mode. The current
    /// semantics deliberately leave an unresolved placeholder as its
    /// literal string, so this variant is never produced today.
    #[error("unresolved placeholder '{name}'")]
    UnresolvedPlaceholder { name: String },
}
