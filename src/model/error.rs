use thiserror::Error;

/// Failures an action can report to the caller of the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// A `ReadLine` found no remaining console input
    #[error("end of input: no line left to read")]
    EndOfInput,

    /// A `Forever` loop saw its cancel token fired between two iterations
    #[error("cancelled")]
    Cancelled,

    #[error("console failure: {0}")]
    Console(String),
}

impl From<std::io::Error> for ActionError {
    fn from(e: std::io::Error) -> Self {
        ActionError::Console(e.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("syntax error near: {remaining:?}")]
    Syntax { remaining: String },

    #[error("unknown continuation: {0}")]
    UnknownContinuation(String),
}
