//! Restricted arithmetic evaluator backing the `calculate` tool.
//!
//! Supports decimal numbers, `+ - * /`, unary signs, and parentheses. Nothing
//! else is accepted: identifiers, function calls, and operators such as `**`
//! are syntax errors.

use thiserror::Error;

/// Maximum nesting of parentheses and unary signs.
pub const MAX_DEPTH: usize = 64;

/// Errors produced while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Nothing but whitespace was supplied.
    #[error("expression is empty")]
    Empty,

    /// A character outside the supported grammar was found.
    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedChar {
        /// Offending character.
        ch: char,
        /// Byte offset into the expression.
        offset: usize,
    },

    /// Input ended while an operand or `)` was still expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A numeric literal could not be parsed.
    #[error("invalid number `{literal}`")]
    InvalidNumber {
        /// The literal as written.
        literal: String,
    },

    /// Right-hand side of a division evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Nesting exceeded [`MAX_DEPTH`].
    #[error("expression nested deeper than {MAX_DEPTH} levels")]
    TooDeep,

    /// The result overflowed to infinity.
    #[error("result is not a finite number")]
    NonFinite,
}

/// Evaluates an arithmetic expression.
///
/// # Errors
///
/// Returns a [`CalcError`] describing the first problem encountered.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let mut parser = Parser {
        src: expression,
        pos: 0,
        depth: 0,
    };

    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(CalcError::Empty);
    }

    let value = parser.expr()?;
    parser.skip_whitespace();
    if let Some(ch) = parser.peek() {
        return Err(CalcError::UnexpectedChar {
            ch,
            offset: parser.pos,
        });
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.bump();
                    value += self.term()?;
                }
                Some('-') => {
                    self.bump();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    self.bump();
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.bump();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        self.skip_whitespace();
        match self.peek() {
            Some(sign @ ('+' | '-')) => {
                self.bump();
                self.descend()?;
                let operand = self.unary()?;
                self.depth -= 1;
                Ok(if sign == '-' { -operand } else { operand })
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(CalcError::UnexpectedEnd),
            Some('(') => {
                self.bump();
                self.descend()?;
                let value = self.expr()?;
                self.skip_whitespace();
                match self.peek() {
                    Some(')') => self.bump(),
                    Some(ch) => {
                        return Err(CalcError::UnexpectedChar {
                            ch,
                            offset: self.pos,
                        });
                    }
                    None => return Err(CalcError::UnexpectedEnd),
                }
                self.depth -= 1;
                Ok(value)
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.number(),
            Some(ch) => Err(CalcError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
        }
    }

    fn number(&mut self) -> Result<f64, CalcError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '.')
        {
            self.bump();
        }
        let literal = &self.src[start..self.pos];
        literal.parse::<f64>().map_err(|_| CalcError::InvalidNumber {
            literal: literal.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_basic_arithmetic() {
        assert_eq!(evaluate("2 + 2"), Ok(4.0));
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(evaluate("10 / 4"), Ok(2.5));
        assert_eq!(evaluate("8 - 3 - 2"), Ok(3.0));
    }

    #[test]
    fn handles_unary_signs_and_decimals() {
        assert_eq!(evaluate("-3 + +5"), Ok(2.0));
        assert_eq!(evaluate("-(1.5 * 2)"), Ok(-3.0));
        assert_eq!(evaluate(".5 + 1."), Ok(1.5));
    }

    #[test]
    fn rejects_identifiers() {
        let err = evaluate("not_a_number + 5").expect_err("identifier");
        assert_eq!(err, CalcError::UnexpectedChar { ch: 'n', offset: 0 });
    }

    #[test]
    fn rejects_code_like_input() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("2 ** 3").is_err());
        assert!(evaluate("abs(-1)").is_err());
    }

    #[test]
    fn reports_structural_errors() {
        assert_eq!(evaluate("   "), Err(CalcError::Empty));
        assert_eq!(evaluate("2 +"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(CalcError::UnexpectedEnd));
        assert!(matches!(
            evaluate("1 2"),
            Err(CalcError::UnexpectedChar { ch: '2', .. })
        ));
        assert!(matches!(
            evaluate("1.2.3"),
            Err(CalcError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn rejects_division_by_zero() {
        assert_eq!(evaluate("1 / (2 - 2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn bounds_nesting_depth() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&deep), Err(CalcError::TooDeep));

        let signs = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate(&signs), Err(CalcError::TooDeep));

        let fine = format!("{}1{}", "(".repeat(8), ")".repeat(8));
        assert_eq!(evaluate(&fine), Ok(1.0));
    }

    #[test]
    fn rejects_overflow() {
        let huge = format!("1{} * 1{}", "0".repeat(200), "0".repeat(200));
        assert_eq!(evaluate(&huge), Err(CalcError::NonFinite));
    }
}
