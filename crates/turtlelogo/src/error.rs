use crate::{store::ResolveError, value::Value};

// TODO: carry the column of the offending word, so the CLI can point at it.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("{name} has no value")]
    Undefined { name: String },
    #[error(":{name} refers back to itself")]
    CyclicReference { name: String },
    #[error("Not enough inputs to {proc}")]
    NotEnoughInputs { proc: String },
    #[error("You don't say what to do with {word}")]
    UnusedInput { word: String },
    #[error("{proc} doesn't like {word} as input")]
    BadInput { proc: String, word: String },
    #[error("{proc} expected a {expected}, but got {arg}")]
    TypeMismatch {
        proc: String,
        expected: &'static str,
        arg: Value,
    },
    #[error("{proc} can't divide {lhs} by zero")]
    DivideByZero { proc: String, lhs: f64 },
    #[error("{0} isn't a pen color (expected a whole number from 0 to 15)")]
    BadColor(f64),
    #[error("I don't know how to {word}")]
    Erroneous { word: String },
    #[error("{proc} must end its line with {{")]
    MissingBrace { proc: String },
    #[error("{keyword} is missing its closing {closer}")]
    UnterminatedBlock {
        keyword: String,
        closer: &'static str,
    },
    #[error("gave up after {0} steps")]
    StepLimit(u64),
    #[error("calls and blocks nested deeper than {0}")]
    CallDepth(usize),
}

impl EvalError {
    /// Errors that only spoil the statement they occur in.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EvalError::Undefined { .. }
                | EvalError::CyclicReference { .. }
                | EvalError::TypeMismatch { .. }
                | EvalError::DivideByZero { .. }
                | EvalError::BadColor(_)
        )
    }
}

impl From<ResolveError> for EvalError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Undefined(name) => EvalError::Undefined { name },
            ResolveError::CyclicReference(name) => EvalError::CyclicReference { name },
        }
    }
}

/// An [`EvalError`] together with the line it happened on.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("line {line}: {source} (in `{content}`)")]
pub struct Error {
    /// 1-based.
    pub line: usize,
    pub content: String,
    pub source: EvalError,
}
