//! Tokenizer for the literal grammar.
//!
//! Recognizes every operator symbol the host language knows so the parser can
//! name a rejected operator instead of reporting a stray character.

use std::num::IntErrorKind;

use crate::error::LiteralError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Str(String),
    Bytes(Vec<u8>),
    /// Unsigned magnitude; the parser narrows it to `i64`.
    Int(u64),
    Float(f64),
    Imaginary(f64),
    Ident(String),
    Punct(char),
    Operator(&'static str),
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Str(_) => "string literal".to_string(),
            Token::Bytes(_) => "bytes literal".to_string(),
            Token::Int(_) | Token::Float(_) | Token::Imaginary(_) => "number".to_string(),
            Token::Ident(name) => format!("name {name:?}"),
            Token::Punct(c) => format!("{c:?}"),
            Token::Operator(op) => format!("operator {op:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Longest first, so `**` wins over `*`.
const OPERATORS: &[&str] = &[
    "**", "//", "==", "!=", "<=", ">=", "<<", ">>", ":=", "<", ">", "=", "*", "/", "%", "&", "|",
    "^", "~", "@", ".", ";", "!",
];

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, LiteralError> {
    Lexer {
        chars: input.chars().collect(),
        pos: 0,
    }
    .run()
}

#[derive(Debug, Default, Clone, Copy)]
struct StringPrefix {
    bytes: bool,
    raw: bool,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn run(mut self) -> Result<Vec<Spanned>, LiteralError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            let offset = self.pos;
            if ch.is_whitespace() {
                self.pos += 1;
                continue;
            }
            if ch == '#' {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.pos += 1;
                }
                continue;
            }

            let token = if ch == '\'' || ch == '"' {
                self.string(StringPrefix::default())?
            } else if ch.is_ascii_digit()
                || (ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.number()?
            } else if ch == '_' || ch.is_alphabetic() {
                self.ident_or_prefixed_string()?
            } else if matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | ',' | '+' | '-')
                || (ch == ':' && self.peek_at(1) != Some('='))
            {
                self.pos += 1;
                Token::Punct(ch)
            } else if let Some(op) = self.operator() {
                op
            } else {
                return Err(LiteralError::UnexpectedChar { ch, offset });
            };
            tokens.push(Spanned { token, offset });
        }
        Ok(tokens)
    }

    fn operator(&mut self) -> Option<Token> {
        for op in OPERATORS {
            let len = op.chars().count();
            let matches = op
                .chars()
                .enumerate()
                .all(|(i, c)| self.peek_at(i) == Some(c));
            if matches {
                self.pos += len;
                return Some(Token::Operator(*op));
            }
        }
        None
    }

    fn ident_or_prefixed_string(&mut self) -> Result<Token, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
            self.pos += 1;
        }
        let word = self.slice(start);

        if matches!(self.peek(), Some('\'' | '"')) {
            let lower = word.to_ascii_lowercase();
            match lower.as_str() {
                "b" | "br" | "rb" => {
                    return self.string(StringPrefix {
                        bytes: true,
                        raw: lower.contains('r'),
                    })
                }
                "r" | "u" => {
                    return self.string(StringPrefix {
                        bytes: false,
                        raw: lower == "r",
                    })
                }
                "f" | "fr" | "rf" => return Err(LiteralError::FormattedString(start)),
                _ => {}
            }
        }
        Ok(Token::Ident(word))
    }

    // -----------------------------------------------------------------------
    // Numbers
    // -----------------------------------------------------------------------

    fn number(&mut self) -> Result<Token, LiteralError> {
        let start = self.pos;

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.pos += 2;
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
                    self.pos += 1;
                }
                let digits = self.slice(digits_start);
                // A leading underscore is allowed right after the radix prefix.
                let digits = digits.strip_prefix('_').unwrap_or(&digits);
                let cleaned = clean_digits(digits, |c| c.is_digit(radix))
                    .ok_or_else(|| self.invalid_number(start))?;
                return u64::from_str_radix(&cleaned, radix)
                    .map(Token::Int)
                    .map_err(|e| match e.kind() {
                        IntErrorKind::PosOverflow => {
                            LiteralError::IntegerOverflow(self.slice(start))
                        }
                        _ => self.invalid_number(start),
                    });
            }
        }

        let mut is_float = false;
        self.eat_digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.invalid_number(start));
            }
            self.eat_digits();
        }
        let body = self.slice(start);
        let imaginary = matches!(self.peek(), Some('j' | 'J'));
        if imaginary {
            self.pos += 1;
        }
        if self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
            self.pos += 1;
            return Err(self.invalid_number(start));
        }

        let cleaned = clean_digits(&body, |c| c.is_ascii_digit())
            .ok_or_else(|| self.invalid_number(start))?;
        if imaginary {
            return cleaned
                .parse::<f64>()
                .map(Token::Imaginary)
                .map_err(|_| self.invalid_number(start));
        }
        if is_float {
            return cleaned
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.invalid_number(start));
        }
        if cleaned.len() > 1 && cleaned.starts_with('0') && cleaned.chars().any(|c| c != '0') {
            return Err(self.invalid_number(start));
        }
        cleaned.parse::<u64>().map(Token::Int).map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => LiteralError::IntegerOverflow(body.clone()),
            _ => self.invalid_number(start),
        })
    }

    fn invalid_number(&self, start: usize) -> LiteralError {
        LiteralError::InvalidNumber {
            text: self.slice(start),
            offset: start,
        }
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c == '_' || c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    // -----------------------------------------------------------------------
    // Strings
    // -----------------------------------------------------------------------

    fn string(&mut self, prefix: StringPrefix) -> Result<Token, LiteralError> {
        let start = self.pos;
        let quote = self.chars[self.pos];
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut units: Vec<u32> = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(LiteralError::UnterminatedString(start));
            };
            if c == quote {
                if !triple {
                    self.pos += 1;
                    break;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.pos += 3;
                    break;
                }
            }
            if c == '\n' && !triple {
                return Err(LiteralError::UnterminatedString(start));
            }
            self.pos += 1;

            if c != '\\' {
                push_literal(&mut units, c, prefix, start)?;
                continue;
            }
            let Some(next) = self.peek() else {
                return Err(LiteralError::UnterminatedString(start));
            };
            if prefix.raw {
                // The backslash stays; it only keeps the next quote from closing.
                units.push('\\' as u32);
                push_literal(&mut units, next, prefix, start)?;
                self.pos += 1;
                continue;
            }
            self.escape(&mut units, prefix)?;
        }

        if prefix.bytes {
            let bytes = units
                .into_iter()
                .map(|u| u8::try_from(u).map_err(|_| LiteralError::NonAsciiBytes(start)))
                .collect::<Result<Vec<u8>, _>>()?;
            return Ok(Token::Bytes(bytes));
        }
        let text = units
            .into_iter()
            .map(|u| {
                char::from_u32(u).ok_or_else(|| LiteralError::InvalidEscape {
                    offset: start,
                    reason: format!("code point {u:#x} is not a valid character"),
                })
            })
            .collect::<Result<String, _>>()?;
        Ok(Token::Str(text))
    }

    fn escape(&mut self, units: &mut Vec<u32>, prefix: StringPrefix) -> Result<(), LiteralError> {
        let offset = self.pos - 1;
        let c = self.chars[self.pos];
        self.pos += 1;
        let simple = match c {
            '\n' => return Ok(()),
            '\\' | '\'' | '"' => Some(c as u32),
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(0x0a),
            'r' => Some(0x0d),
            't' => Some(0x09),
            'v' => Some(0x0b),
            _ => None,
        };
        if let Some(unit) = simple {
            units.push(unit);
            return Ok(());
        }

        match c {
            '0'..='7' => {
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.pos += 1;
                        }
                        None => break,
                    }
                }
                if prefix.bytes && value > 0xff {
                    return Err(LiteralError::InvalidEscape {
                        offset,
                        reason: format!("octal escape {value:#o} is out of range for bytes"),
                    });
                }
                units.push(value);
            }
            'x' => units.push(self.hex_escape(2, offset)?),
            'u' if !prefix.bytes => units.push(self.hex_escape(4, offset)?),
            'U' if !prefix.bytes => units.push(self.hex_escape(8, offset)?),
            'N' if !prefix.bytes => {
                return Err(LiteralError::InvalidEscape {
                    offset,
                    reason: "named unicode escapes are not supported".to_string(),
                })
            }
            other => {
                units.push('\\' as u32);
                push_literal(units, other, prefix, offset)?;
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, len: usize, offset: usize) -> Result<u32, LiteralError> {
        let mut value: u32 = 0;
        for _ in 0..len {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LiteralError::InvalidEscape {
                    offset,
                    reason: format!("expected {len} hex digits"),
                })?;
            value = value
                .checked_mul(16)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| LiteralError::InvalidEscape {
                    offset,
                    reason: "escape value out of range".to_string(),
                })?;
            self.pos += 1;
        }
        Ok(value)
    }
}

fn push_literal(
    units: &mut Vec<u32>,
    c: char,
    prefix: StringPrefix,
    start: usize,
) -> Result<(), LiteralError> {
    if prefix.bytes && !c.is_ascii() {
        return Err(LiteralError::NonAsciiBytes(start));
    }
    units.push(c as u32);
    Ok(())
}

/// Strip digit-group underscores. Each underscore must sit between two digits.
fn clean_digits(text: &str, is_digit: impl Fn(char) -> bool) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let prev_ok = i > 0 && is_digit(chars[i - 1]);
            let next_ok = chars.get(i + 1).is_some_and(|&n| is_digit(n));
            if !prev_ok || !next_ok {
                return None;
            }
            continue;
        }
        out.push(c);
    }
    if out.is_empty() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn numbers() {
        assert_eq!(tokens("42"), vec![Token::Int(42)]);
        assert_eq!(tokens("1_000"), vec![Token::Int(1000)]);
        assert_eq!(tokens("0xff 0o17 0b101"), vec![
            Token::Int(255),
            Token::Int(15),
            Token::Int(5)
        ]);
        assert_eq!(tokens("1.5 .5 1e3 2.5E-1"), vec![
            Token::Float(1.5),
            Token::Float(0.5),
            Token::Float(1000.0),
            Token::Float(0.25)
        ]);
        assert_eq!(tokens("2j 1.5J"), vec![
            Token::Imaginary(2.0),
            Token::Imaginary(1.5)
        ]);
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(tokenize("012").is_err());
        assert!(tokenize("1__0").is_err());
        assert!(tokenize("1_").is_err());
        assert!(tokenize("1e").is_err());
        assert!(tokenize("12abc").is_err());
        assert!(tokenize("0x").is_err());
        assert!(tokenize("0b102").is_err());
        assert_eq!(tokens("00"), vec![Token::Int(0)]);
    }

    #[test]
    fn integer_overflow_is_reported() {
        let err = tokenize("99999999999999999999999").unwrap_err();
        assert!(matches!(err, LiteralError::IntegerOverflow(_)));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(tokens(r#"'a\nb'"#), vec![Token::Str("a\nb".into())]);
        assert_eq!(tokens(r#""it's""#), vec![Token::Str("it's".into())]);
        assert_eq!(tokens(r"'\x41é\U0001F600'"), vec![Token::Str(
            "A\u{e9}\u{1F600}".into()
        )]);
        assert_eq!(tokens(r"'\101'"), vec![Token::Str("A".into())]);
        assert_eq!(tokens(r"'\q'"), vec![Token::Str("\\q".into())]);
    }

    #[test]
    fn raw_and_triple_quoted_strings() {
        assert_eq!(tokens(r"r'a\nb'"), vec![Token::Str("a\\nb".into())]);
        assert_eq!(tokens("'''a\n'b'\n'''"), vec![Token::Str("a\n'b'\n".into())]);
    }

    #[test]
    fn bytes_literals() {
        assert_eq!(tokens(r"b'ab\x00\xff'"), vec![Token::Bytes(vec![
            b'a', b'b', 0x00, 0xff
        ])]);
        assert_eq!(tokens(r"B'\u0041'"), vec![Token::Bytes(b"\\u0041".to_vec())]);
        assert!(matches!(
            tokenize("b'\u{e9}'").unwrap_err(),
            LiteralError::NonAsciiBytes(_)
        ));
    }

    #[test]
    fn unterminated_strings() {
        assert!(matches!(
            tokenize("'abc").unwrap_err(),
            LiteralError::UnterminatedString(0)
        ));
        assert!(tokenize("'a\nb'").is_err());
        assert!(tokenize(r"'abc\'").is_err());
    }

    #[test]
    fn f_strings_are_rejected() {
        assert!(matches!(
            tokenize("f'{x}'").unwrap_err(),
            LiteralError::FormattedString(0)
        ));
    }

    #[test]
    fn operators_are_tokenized_by_name() {
        assert_eq!(tokens("1 == 2"), vec![
            Token::Int(1),
            Token::Operator("=="),
            Token::Int(2)
        ]);
        assert_eq!(tokens("a.b"), vec![
            Token::Ident("a".into()),
            Token::Operator("."),
            Token::Ident("b".into())
        ]);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(tokens("  1 # one\n"), vec![Token::Int(1)]);
    }

    #[test]
    fn unknown_characters_fail() {
        assert!(matches!(
            tokenize("1 $ 2").unwrap_err(),
            LiteralError::UnexpectedChar { ch: '$', offset: 2 }
        ));
    }
}
