//! Recursive-descent parser for the literal grammar.
//!
//! ```text
//! top      := expr (',' expr)* [',']
//! expr     := unary (('+' | '-') unary)*
//! unary    := ('+' | '-') unary | postfix
//! postfix  := NAME '(' args ')' | atom
//! atom     := STRING+ | BYTES+ | NUMBER | NAME
//!           | '(' [expr (',' expr)* [',']] ')'
//!           | '[' [expr (',' expr)* [',']] ']'
//!           | '{' [expr ':' expr (',' expr ':' expr)* [','] | expr (',' expr)* [',']] '}'
//! ```
//!
//! Names and calls are kept in the tree so evaluation can reject them with the
//! offending name; every other construct outside this grammar fails here.

use crate::error::LiteralError;
use crate::lexer::{tokenize, Spanned, Token};
use crate::value::Value;

/// Maximum nesting of containers, unary operators and `+`/`-` chains.
pub const MAX_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Value),
    Name(String),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Left-associative `first op term op term ...`, kept flat so long
    /// chains do not deepen the tree.
    Sum {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
    },
    Call {
        func: String,
        args: Vec<Expr>,
    },
}

/// Parse literal text into an expression tree without evaluating it.
pub fn parse(input: &str) -> Result<Expr, LiteralError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_top()?;
    if let Some((token, offset)) = parser.peek_with_offset() {
        return Err(unexpected(token, offset));
    }
    Ok(expr)
}

fn unexpected(token: &Token, offset: usize) -> LiteralError {
    match token {
        Token::Operator(op) => LiteralError::OperatorNotAllowed {
            op: op.to_string(),
            offset,
        },
        other => LiteralError::UnexpectedToken {
            found: other.describe(),
            offset,
        },
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_with_offset(&self) -> Option<(&Token, usize)> {
        self.tokens.get(self.pos).map(|s| (&s.token, s.offset))
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek() == Some(&Token::Punct(c)) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect_punct(&mut self, c: char) -> Result<(), LiteralError> {
        if self.eat_punct(c) {
            return Ok(());
        }
        match self.peek_with_offset() {
            Some((token, offset)) => Err(unexpected(token, offset)),
            None => Err(LiteralError::UnexpectedEof),
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_top(&mut self) -> Result<Expr, LiteralError> {
        let first = self.parse_expr()?;
        if !self.eat_punct(',') {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek().is_some() {
            items.push(self.parse_expr()?);
            if !self.eat_punct(',') {
                break;
            }
        }
        Ok(Expr::Tuple(items))
    }

    fn parse_expr(&mut self) -> Result<Expr, LiteralError> {
        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Punct('+')) => BinaryOp::Add,
                Some(Token::Punct('-')) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            if rest.len() + 1 >= MAX_DEPTH {
                return Err(LiteralError::TooDeep(MAX_DEPTH));
            }
            rest.push((op, self.parse_unary()?));
        }
        if let Some((token, offset)) = self.peek_with_offset() {
            if matches!(token, Token::Operator(_)) {
                return Err(unexpected(token, offset));
            }
        }
        if rest.is_empty() {
            return Ok(first);
        }
        Ok(Expr::Sum {
            first: Box::new(first),
            rest,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, LiteralError> {
        let op = match self.peek() {
            Some(Token::Punct('+')) => UnaryOp::Plus,
            Some(Token::Punct('-')) => UnaryOp::Minus,
            _ => return self.parse_postfix(),
        };
        self.pos += 1;

        // i64::MIN has no positive counterpart, so fold it here.
        if op == UnaryOp::Minus && self.peek() == Some(&Token::Int(1u64 << 63)) {
            self.pos += 1;
            return Ok(Expr::Constant(Value::Int(i64::MIN)));
        }

        self.enter()?;
        let operand = self.parse_unary()?;
        self.leave();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, LiteralError> {
        let atom = self.parse_atom()?;
        let expr = match atom {
            Expr::Name(func) if self.eat_punct('(') => {
                let args = self.parse_call_args()?;
                Expr::Call { func, args }
            }
            other => other,
        };
        match self.peek_with_offset() {
            Some((Token::Operator("."), offset)) => Err(LiteralError::AttributeAccess(offset)),
            Some((Token::Punct('['), offset)) => Err(LiteralError::Subscript(offset)),
            Some((Token::Punct('('), offset)) => Err(LiteralError::UnexpectedToken {
                found: "call on a non-name expression".to_string(),
                offset,
            }),
            _ => Ok(expr),
        }
    }

    fn parse_atom(&mut self) -> Result<Expr, LiteralError> {
        let Some(Spanned { token, offset }) = self.tokens.get(self.pos).cloned() else {
            return Err(LiteralError::UnexpectedEof);
        };
        self.pos += 1;
        match token {
            Token::Str(s) => self.concat_str(s, offset),
            Token::Bytes(b) => self.concat_bytes(b, offset),
            Token::Int(v) => i64::try_from(v)
                .map(|v| Expr::Constant(Value::Int(v)))
                .map_err(|_| LiteralError::IntegerOverflow(v.to_string())),
            Token::Float(f) => Ok(Expr::Constant(Value::Float(f))),
            Token::Imaginary(im) => Ok(Expr::Constant(Value::Complex { re: 0.0, im })),
            Token::Ident(name) => Ok(match name.as_str() {
                "True" => Expr::Constant(Value::Bool(true)),
                "False" => Expr::Constant(Value::Bool(false)),
                "None" => Expr::Constant(Value::None),
                _ => Expr::Name(name),
            }),
            Token::Punct('(') => self.nested(Self::parse_paren),
            Token::Punct('[') => self.nested(|p| p.parse_items(']').map(Expr::List)),
            Token::Punct('{') => self.nested(Self::parse_brace),
            other => Err(unexpected(&other, offset)),
        }
    }

    fn nested(
        &mut self,
        inner: impl FnOnce(&mut Self) -> Result<Expr, LiteralError>,
    ) -> Result<Expr, LiteralError> {
        self.enter()?;
        let expr = inner(self)?;
        self.leave();
        Ok(expr)
    }

    fn concat_str(&mut self, mut s: String, offset: usize) -> Result<Expr, LiteralError> {
        loop {
            match self.peek() {
                Some(Token::Str(next)) => s.push_str(next),
                Some(Token::Bytes(_)) => return Err(LiteralError::MixedStringKinds(offset)),
                _ => return Ok(Expr::Constant(Value::Str(s))),
            }
            self.pos += 1;
        }
    }

    fn concat_bytes(&mut self, mut b: Vec<u8>, offset: usize) -> Result<Expr, LiteralError> {
        loop {
            match self.peek() {
                Some(Token::Bytes(next)) => b.extend_from_slice(next),
                Some(Token::Str(_)) => return Err(LiteralError::MixedStringKinds(offset)),
                _ => return Ok(Expr::Constant(Value::Bytes(b))),
            }
            self.pos += 1;
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn parse_items(&mut self, close: char) -> Result<Vec<Expr>, LiteralError> {
        let mut items = Vec::new();
        loop {
            if self.eat_punct(close) {
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            if !self.eat_punct(',') {
                self.expect_punct(close)?;
                return Ok(items);
            }
        }
    }

    fn parse_paren(&mut self) -> Result<Expr, LiteralError> {
        if self.eat_punct(')') {
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.parse_expr()?;
        if !self.eat_punct(',') {
            self.expect_punct(')')?;
            return Ok(first);
        }
        let mut items = vec![first];
        items.extend(self.parse_items(')')?);
        Ok(Expr::Tuple(items))
    }

    fn parse_brace(&mut self) -> Result<Expr, LiteralError> {
        if self.eat_punct('}') {
            return Ok(Expr::Dict(Vec::new()));
        }
        let first = self.parse_expr()?;
        if !self.eat_punct(':') {
            let mut items = vec![first];
            if self.eat_punct(',') {
                items.extend(self.parse_items('}')?);
            } else {
                self.expect_punct('}')?;
            }
            return Ok(Expr::Set(items));
        }

        let mut pairs = vec![(first, self.parse_expr()?)];
        loop {
            if !self.eat_punct(',') {
                self.expect_punct('}')?;
                return Ok(Expr::Dict(pairs));
            }
            if self.eat_punct('}') {
                return Ok(Expr::Dict(pairs));
            }
            let key = self.parse_expr()?;
            self.expect_punct(':')?;
            pairs.push((key, self.parse_expr()?));
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, LiteralError> {
        let mut args = Vec::new();
        loop {
            if self.eat_punct(')') {
                return Ok(args);
            }
            if let (Some(Token::Ident(_)), Some(eq)) = (self.peek(), self.tokens.get(self.pos + 1))
            {
                if eq.token == Token::Operator("=") {
                    return Err(LiteralError::KeywordArgument(eq.offset));
                }
            }
            args.push(self.parse_expr()?);
            if !self.eat_punct(',') {
                self.expect_punct(')')?;
                return Ok(args);
            }
        }
    }
}
