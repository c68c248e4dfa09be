//! Restricted literal grammar.
//!
//! Parses and evaluates nested literal values (strings, bytes, numbers,
//! `True`/`False`/`None`, lists, tuples, sets, dicts, signed numbers, `+`/`-`
//! between numbers and the `set(...)` constructor) from untrusted text. Any
//! other construct is rejected; nothing is ever handed to an interpreter.

pub mod error;
mod eval;
mod lexer;
pub mod parser;
mod repr;
pub mod value;

pub use error::LiteralError;
pub use eval::evaluate;
pub use parser::{parse, BinaryOp, Expr, UnaryOp, MAX_DEPTH};
pub use repr::to_literal;
pub use value::Value;

/// Parse and evaluate literal text.
pub fn literal_eval(text: &str) -> Result<Value, LiteralError> {
    let expr = parse(text)?;
    evaluate(&expr)
}
