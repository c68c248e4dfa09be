use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("Unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),

    #[error("Invalid escape at offset {offset}: {reason}")]
    InvalidEscape { offset: usize, reason: String },

    #[error("Bytes literal at offset {0} can only contain ASCII characters")]
    NonAsciiBytes(usize),

    #[error("Cannot mix bytes and str literals (offset {0})")]
    MixedStringKinds(usize),

    #[error("f-strings are not allowed (offset {0})")]
    FormattedString(usize),

    #[error("Invalid number literal {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("Integer literal {0} does not fit in 64 bits")]
    IntegerOverflow(String),

    #[error("Operator {op:?} is not allowed (offset {offset})")]
    OperatorNotAllowed { op: String, offset: usize },

    #[error("Attribute access is not allowed (offset {0})")]
    AttributeAccess(usize),

    #[error("Subscripting is not allowed (offset {0})")]
    Subscript(usize),

    #[error("Keyword arguments are not allowed (offset {0})")]
    KeywordArgument(usize),

    #[error("Name {0:?} is not allowed")]
    NameNotAllowed(String),

    #[error("Call to {0:?} is not allowed")]
    CallNotAllowed(String),

    #[error("Nesting exceeds maximum depth of {0}")]
    TooDeep(usize),

    #[error("Unary {op} is not supported for {type_name}")]
    NonNumericUnary { op: char, type_name: &'static str },

    #[error("Binary {op} is not supported between {left} and {right}")]
    NonNumericBinary {
        op: char,
        left: &'static str,
        right: &'static str,
    },

    #[error("Integer arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Unhashable type: {0}")]
    Unhashable(&'static str),

    #[error("set() takes at most 1 argument ({0} given)")]
    SetArity(usize),

    #[error("{0} object is not iterable")]
    NotIterable(&'static str),
}
