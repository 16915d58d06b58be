//! Parsing for CONST operand tokens: `#N` decimal, `xN` hex, `bN` binary,
//! or bare decimal digits.

use crate::error::AsmError;
use crate::token::Token;

/// Parse a CONST token's lexeme into a signed integer. Hex and binary
/// literals are unsigned by convention (`x3000`, `b1010`); decimal
/// literals (`#N` or bare digits) may carry a sign.
pub fn parse_value(token: &Token, line_number: usize, line: &str) -> Result<i64, AsmError> {
    let invalid = || AsmError::InvalidOperand {
        operand: token.value.clone(),
        line_number,
        line: line.to_string(),
        span: token.span,
    };

    let lexeme = token.value.as_str();
    let result = if let Some(rest) = lexeme.strip_prefix('#') {
        rest.parse::<i64>().ok()
    } else if let Some(rest) = lexeme.strip_prefix('x').or_else(|| lexeme.strip_prefix('X')) {
        i64::from_str_radix(rest, 16).ok()
    } else if let Some(rest) = lexeme.strip_prefix('b').or_else(|| lexeme.strip_prefix('B')) {
        i64::from_str_radix(rest, 2).ok()
    } else {
        lexeme.parse::<i64>().ok()
    };

    result.ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Span, TokenKind};

    fn tok(s: &str) -> Token {
        Token::new(s, TokenKind::Const, Span::new(0, s.len()))
    }

    #[test]
    fn decimal_with_hash() {
        assert_eq!(parse_value(&tok("#10"), 1, "").unwrap(), 10);
        assert_eq!(parse_value(&tok("#-5"), 1, "").unwrap(), -5);
    }

    #[test]
    fn hex_and_binary_are_unsigned() {
        assert_eq!(parse_value(&tok("x3000"), 1, "").unwrap(), 0x3000);
        assert_eq!(parse_value(&tok("xFF"), 1, "").unwrap(), 0xFF);
        assert_eq!(parse_value(&tok("b1010"), 1, "").unwrap(), 0b1010);
    }

    #[test]
    fn bare_digits_are_decimal() {
        assert_eq!(parse_value(&tok("42"), 1, "").unwrap(), 42);
        assert_eq!(parse_value(&tok("-7"), 1, "").unwrap(), -7);
    }

    #[test]
    fn garbage_is_invalid_operand() {
        let err = parse_value(&tok("notanumber"), 1, "line");
        assert!(matches!(err, Err(AsmError::InvalidOperand { .. })));
    }
}
