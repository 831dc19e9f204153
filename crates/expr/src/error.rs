use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExpressionError {
    #[error("expression is blank")]
    Blank,

    #[error("parse error in '{expression}': {message}")]
    Parse { expression: String, message: String },

    #[error("expression '{expression}' evaluated to {actual}, expected a boolean")]
    NotBoolean { expression: String, actual: String },

    #[error("error evaluating '{expression}': {message}")]
    Eval { expression: String, message: String },

    #[error("function '{function}' error: {message}")]
    Function { function: String, message: String },
}
