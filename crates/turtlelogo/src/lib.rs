//! An interpreter for a small, line-oriented turtle language.
//!
//! Every line is one statement. Its first word decides what kind of statement it is:
//!
//! ```text
//! // draw a square
//! make "side 10
//! pendown
//! to edge :len
//!   forward :len
//!   turn 90
//! end
//! make "i 0
//! while < :i 4 {
//!   edge :side
//!   addassign "i 1
//! }
//! ```
//!
//! Running a program moves a turtle around, and every move made with the pen down is handed to a
//! [`Canvas`] as a line segment. Drawing pixels (or anything else) is up to the canvas.

pub mod error;
pub mod expr;
pub mod interp;
pub mod lexer;
pub mod statement;
pub mod store;
pub mod turtle;
pub mod value;

pub use error::{Error, EvalError};
pub use interp::{Config, ErrorPolicy, Interpreter, Report};
pub use lexer::{tokenize, Lexeme, Token};
pub use statement::{classify, StatementKind};
pub use store::{ResolveError, VariableStore};
pub use turtle::{Canvas, MoveCmd, PenState, Segment, PALETTE};
pub use value::Value;

/// Run `program` in a fresh session with the default configuration.
pub fn run(program: &str, canvas: &mut dyn Canvas) -> Result<Report, Error> {
    Interpreter::default().run(program, canvas)
}
