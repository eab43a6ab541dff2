//! Recursive-descent evaluator for generated expressions.
//!
//! Accepts integer literals, `+ - * /` and parentheses, with the usual
//! precedence and left associativity:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := INTEGER | '(' expr ')'
//! ```
//!
//! Integer sub-expressions are exact arbitrary-precision integers. `/`
//! always produces a float, computed from the exact quotient with a single
//! round-to-nearest-even step, and a float operand makes the whole
//! operation float.

use std::iter::Peekable;
use std::str::CharIndices;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};
use thiserror::Error;

use super::grammar::BinOp;
use super::hexfloat::scale_by_pow2;

/// Errors produced while evaluating expression text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unmatched '(' at offset {pos}")]
    UnclosedParen { pos: usize },

    #[error("division by zero at offset {pos}")]
    DivisionByZero { pos: usize },
}

/// A value computed by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(BigInt),
    Float(f64),
}

impl Value {
    pub fn int(n: i64) -> Value {
        Value::Int(BigInt::from(n))
    }

    /// Converts to the nearest double. Integers too large for a double
    /// become infinite.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Int(n) => ratio_to_f64(n, &BigInt::one()),
            Value::Float(x) => *x,
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Int(n) => n.is_zero(),
            Value::Float(x) => *x == 0.0,
        }
    }

    fn apply(self, op: BinOp, rhs: Value) -> Value {
        if let (Value::Int(a), Value::Int(b)) = (&self, &rhs) {
            return match op {
                BinOp::Add => Value::Int(a + b),
                BinOp::Sub => Value::Int(a - b),
                BinOp::Mul => Value::Int(a * b),
                BinOp::Div => Value::Float(ratio_to_f64(a, b)),
            };
        }
        let (a, b) = (self.to_f64(), rhs.to_f64());
        Value::Float(match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => a / b,
        })
    }
}

/// Rounds the exact quotient `num / den` to the nearest double, ties to
/// even. `den` must be non-zero.
pub fn ratio_to_f64(num: &BigInt, den: &BigInt) -> f64 {
    let negative = (num.sign() == Sign::Minus) != (den.sign() == Sign::Minus);
    let signed = |x: f64| if negative { -x } else { x };
    let (a, b) = (num.magnitude(), den.magnitude());
    if a.is_zero() {
        return signed(0.0);
    }

    // Scale so the integer quotient carries 56 or 57 bits: at least three
    // below the 53-bit significand of a normal result.
    let shift = 56 - (a.bits() as i64 - b.bits() as i64);
    let (quotient, remainder) = if shift >= 0 {
        let scaled = a << shift as usize;
        (&scaled / b, &scaled % b)
    } else {
        let scaled = b << (-shift) as usize;
        (a / &scaled, a % &scaled)
    };

    let top = quotient.bits() as i64 - 1 - shift;
    if top > 1023 {
        return signed(f64::INFINITY);
    }
    let ulp = (top - 52).max(-1074);
    let dropped = (ulp + shift) as usize;

    let mut significand = &quotient >> dropped;
    let low = &quotient - (&significand << dropped);
    let half = BigUint::one() << (dropped - 1);
    let odd = !(&significand % 2u32).is_zero();
    if low > half || (low == half && (!remainder.is_zero() || odd)) {
        significand += 1u32;
    }

    let significand = significand.to_f64().unwrap_or(f64::INFINITY);
    signed(scale_by_pow2(significand, ulp))
}

/// Evaluates `source` as an arithmetic expression.
pub fn evaluate(source: &str) -> Result<Value, EvalError> {
    let mut evaluator = Evaluator::new(source);
    let value = evaluator.expr()?;
    evaluator.skip_whitespace();
    match evaluator.chars.peek() {
        None => Ok(value),
        Some(&(pos, ch)) => Err(EvalError::UnexpectedChar { ch, pos }),
    }
}

struct Evaluator<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Evaluator<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }

    fn peek_op(&mut self, ops: &[BinOp]) -> Option<(usize, BinOp)> {
        self.skip_whitespace();
        let &(pos, ch) = self.chars.peek()?;
        let op = ops.iter().copied().find(|op| op.as_char() == ch)?;
        self.chars.next();
        Some((pos, op))
    }

    fn expr(&mut self) -> Result<Value, EvalError> {
        let mut lhs = self.term()?;
        while let Some((_, op)) = self.peek_op(&[BinOp::Add, BinOp::Sub]) {
            let rhs = self.term()?;
            lhs = lhs.apply(op, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Value, EvalError> {
        let mut lhs = self.factor()?;
        while let Some((pos, op)) = self.peek_op(&[BinOp::Mul, BinOp::Div]) {
            let rhs = self.factor()?;
            if op == BinOp::Div && rhs.is_zero() {
                return Err(EvalError::DivisionByZero { pos });
            }
            lhs = lhs.apply(op, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Value, EvalError> {
        self.skip_whitespace();
        let Some(&(pos, ch)) = self.chars.peek() else {
            return Err(EvalError::UnexpectedEnd);
        };
        match ch {
            '(' => {
                self.chars.next();
                let inner = self.expr()?;
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ')')) => Ok(inner),
                    Some((pos, ch)) => Err(EvalError::UnexpectedChar { ch, pos }),
                    None => Err(EvalError::UnclosedParen { pos }),
                }
            }
            c if c.is_ascii_digit() => self.integer(pos),
            ch => Err(EvalError::UnexpectedChar { ch, pos }),
        }
    }

    fn integer(&mut self, start: usize) -> Result<Value, EvalError> {
        let mut end = start;
        while let Some((pos, ch)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            end = pos + ch.len_utf8();
        }
        let digits = &self.source.as_bytes()[start..end];
        BigInt::parse_bytes(digits, 10)
            .map(Value::Int)
            .ok_or(EvalError::UnexpectedEnd)
    }
}
