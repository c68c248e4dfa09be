//! Evaluation of parsed literal expressions.
//!
//! Only closed literal forms produce values. Names and calls other than the
//! `set` constructor are refused before any argument is touched.

use crate::error::LiteralError;
use crate::parser::{BinaryOp, Expr, UnaryOp};
use crate::value::Value;

/// The one callable the grammar admits.
const SET_CONSTRUCTOR: &str = "set";

/// Evaluate an expression tree produced by [`crate::parse`].
pub fn evaluate(expr: &Expr) -> Result<Value, LiteralError> {
    match expr {
        Expr::Constant(value) => Ok(value.clone()),
        Expr::Name(name) => Err(LiteralError::NameNotAllowed(name.clone())),
        Expr::List(items) => Ok(Value::List(evaluate_all(items)?)),
        Expr::Tuple(items) => Ok(Value::Tuple(evaluate_all(items)?)),
        Expr::Set(items) => build_set(evaluate_all(items)?),
        Expr::Dict(pairs) => {
            let mut evaluated = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                let key = evaluate(key)?;
                if !key.is_hashable() {
                    return Err(LiteralError::Unhashable(key.type_name()));
                }
                evaluated.push((key, evaluate(value)?));
            }
            Ok(Value::dict(evaluated))
        }
        Expr::Unary { op, operand } => unary(*op, evaluate(operand)?),
        Expr::Sum { first, rest } => {
            let mut acc = evaluate(first)?;
            for (op, term) in rest {
                acc = binary(*op, acc, evaluate(term)?)?;
            }
            Ok(acc)
        }
        Expr::Call { func, args } => {
            if func != SET_CONSTRUCTOR {
                return Err(LiteralError::CallNotAllowed(func.clone()));
            }
            let args = evaluate_all(args)?;
            construct_set(args)
        }
    }
}

fn evaluate_all(items: &[Expr]) -> Result<Vec<Value>, LiteralError> {
    items.iter().map(evaluate).collect()
}

fn build_set(items: Vec<Value>) -> Result<Value, LiteralError> {
    if let Some(bad) = items.iter().find(|v| !v.is_hashable()) {
        return Err(LiteralError::Unhashable(bad.type_name()));
    }
    Ok(Value::set(items))
}

fn construct_set(mut args: Vec<Value>) -> Result<Value, LiteralError> {
    if args.len() > 1 {
        return Err(LiteralError::SetArity(args.len()));
    }
    let Some(source) = args.pop() else {
        return Ok(Value::Set(Vec::new()));
    };
    let items = match source {
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => items,
        Value::Dict(pairs) => pairs.into_iter().map(|(k, _)| k).collect(),
        Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
        Value::Bytes(b) => b.into_iter().map(|byte| Value::Int(i64::from(byte))).collect(),
        other => return Err(LiteralError::NotIterable(other.type_name())),
    };
    build_set(items)
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

fn unary(op: UnaryOp, operand: Value) -> Result<Value, LiteralError> {
    let sign = match op {
        UnaryOp::Plus => '+',
        UnaryOp::Minus => '-',
    };
    match (op, operand) {
        (UnaryOp::Plus, v) if v.is_numeric() => Ok(v),
        (UnaryOp::Minus, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or(LiteralError::ArithmeticOverflow),
        (UnaryOp::Minus, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Minus, Value::Complex { re, im }) => Ok(Value::Complex { re: -re, im: -im }),
        (_, other) => Err(LiteralError::NonNumericUnary {
            op: sign,
            type_name: other.type_name(),
        }),
    }
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, LiteralError> {
    let sign = match op {
        BinaryOp::Add => '+',
        BinaryOp::Sub => '-',
    };
    let non_numeric = || LiteralError::NonNumericBinary {
        op: sign,
        left: left.type_name(),
        right: right.type_name(),
    };

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a.checked_add(*b),
                BinaryOp::Sub => a.checked_sub(*b),
            };
            result.map(Value::Int).ok_or(LiteralError::ArithmeticOverflow)
        }
        (Value::Complex { .. }, _) | (_, Value::Complex { .. }) => {
            let (Some((ar, ai)), Some((br, bi))) = (as_complex(&left), as_complex(&right)) else {
                return Err(non_numeric());
            };
            Ok(match op {
                BinaryOp::Add => Value::Complex {
                    re: ar + br,
                    im: ai + bi,
                },
                BinaryOp::Sub => Value::Complex {
                    re: ar - br,
                    im: ai - bi,
                },
            })
        }
        _ => {
            let (Some(a), Some(b)) = (as_real(&left), as_real(&right)) else {
                return Err(non_numeric());
            };
            Ok(Value::Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
            }))
        }
    }
}

fn as_real(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn as_complex(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Complex { re, im } => Some((*re, *im)),
        other => as_real(other).map(|re| (re, 0.0)),
    }
}
