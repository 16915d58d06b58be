//! Line lexer: splits one source line into a sequence of classified
//! [Token]s.
//!
//! A `"..."` string literal is recognized as a single token *before* the
//! generic whitespace/comma split runs — the original implementation this
//! assembler is descended from tokenized on whitespace first, which broke
//! any `.STRINGZ` argument containing a space (`"Hello World"` became two
//! tokens). Recognizing the literal up front fixes that.

use crate::error::AsmError;
use crate::tables;
use crate::token::{Span, Token, TokenKind};

/// Lex one source line (without its trailing newline) into tokens.
/// Returns an empty vector for a blank or comment-only line.
pub fn lex_line(line_number: usize, line: &str) -> Result<Vec<Token>, AsmError> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut leading = true;

    while i < chars.len() {
        let c = chars[i];
        if c == ';' {
            break; // comment runs to end of line
        }
        if c.is_whitespace() || c == ',' {
            i += 1;
            continue;
        }
        if c == '"' {
            let (token, next) = lex_string(&chars, i, line_number, line)?;
            tokens.push(token);
            i = next;
            leading = false;
            continue;
        }

        let start = i;
        while i < chars.len() && !matches!(chars[i], ' ' | '\t' | ',' | ';' | '"') {
            i += 1;
        }
        let text: String = chars[start..i].iter().collect();
        tokens.push(classify(text, Span::new(start, i), leading, line_number, line)?);
        leading = false;
    }

    Ok(tokens)
}

fn lex_string(
    chars: &[char],
    start: usize,
    line_number: usize,
    line: &str,
) -> Result<(Token, usize), AsmError> {
    let mut i = start + 1; // skip opening quote
    let mut decoded = String::new();
    loop {
        if i >= chars.len() {
            return Err(AsmError::UnterminatedString {
                line_number,
                line: line.to_string(),
                span: Span::new(start, chars.len()),
            });
        }
        match chars[i] {
            '"' => {
                i += 1;
                break;
            }
            '\\' => {
                let esc_at = i;
                i += 1;
                if i >= chars.len() {
                    return Err(AsmError::UnterminatedString {
                        line_number,
                        line: line.to_string(),
                        span: Span::new(start, chars.len()),
                    });
                }
                let decoded_char = match chars[i] {
                    'n' => '\n',
                    't' => '\t',
                    '\\' => '\\',
                    '"' => '"',
                    '0' => '\0',
                    other => {
                        return Err(AsmError::InvalidEscape {
                            escape: other,
                            line_number,
                            line: line.to_string(),
                            span: Span::new(esc_at, i + 1),
                        });
                    }
                };
                decoded.push(decoded_char);
                i += 1;
            }
            ch => {
                decoded.push(ch);
                i += 1;
            }
        }
    }
    Ok((Token::new(decoded, TokenKind::String, Span::new(start, i)), i))
}

fn classify(
    text: String,
    span: Span,
    leading: bool,
    line_number: usize,
    line: &str,
) -> Result<Token, AsmError> {
    if tables::is_opcode(&text) {
        return Ok(Token::new(text, TokenKind::Opcode, span));
    }
    if let Some(rest) = text.strip_prefix('.') {
        let directive = format!(".{rest}");
        if tables::is_directive(&directive) {
            return Ok(Token::new(text, TokenKind::Directive, span));
        }
        return Err(AsmError::UnrecognizedToken {
            text,
            line_number,
            line: line.to_string(),
            span,
        });
    }
    if tables::register_code(&text).is_some() {
        return Ok(Token::new(text, TokenKind::Register, span));
    }
    if tables::trap_vector(&text).is_some() {
        return Ok(Token::new(text, TokenKind::Trap, span));
    }
    if leading {
        return Ok(Token::new(text, TokenKind::Label, span));
    }
    Ok(Token::new(text, TokenKind::Const, span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        lex_line(1, line).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn strips_comments() {
        assert_eq!(lex_line(1, "  ; just a comment").unwrap().len(), 0);
        assert_eq!(kinds("ADD R0, R0, R1 ; add them"), vec![
            TokenKind::Opcode,
            TokenKind::Register,
            TokenKind::Register,
            TokenKind::Register,
        ]);
    }

    #[test]
    fn quoted_string_with_spaces_is_one_token() {
        let tokens = lex_line(1, "MSG .STRINGZ \"Hello World\"").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Label);
        assert_eq!(tokens[1].kind, TokenKind::Directive);
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].value, "Hello World");
    }

    #[test]
    fn decodes_escapes() {
        let tokens = lex_line(1, r#".STRINGZ "a\nb\tc\\d\"e""#).unwrap();
        assert_eq!(tokens[1].value, "a\nb\tc\\d\"e");
    }

    #[test]
    fn unterminated_string_errors() {
        let err = lex_line(1, ".STRINGZ \"never closed");
        assert!(matches!(err, Err(AsmError::UnterminatedString { .. })));
    }

    #[test]
    fn invalid_escape_errors() {
        let err = lex_line(1, r#".STRINGZ "bad\qescape""#);
        assert!(matches!(err, Err(AsmError::InvalidEscape { .. })));
    }

    #[test]
    fn label_only_recognized_in_leading_position() {
        let tokens = lex_line(1, "LOOP ADD R0, R0, #1").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Label);
        assert_eq!(tokens[0].value, "LOOP");
    }

    #[test]
    fn bare_br_is_opcode() {
        // LOOP sits in operand position here, not leading, so it lexes as
        // Const — the same kind a label reference always gets outside the
        // leading column (see `classify`'s leading-only Label branch).
        assert_eq!(kinds("BR LOOP"), vec![TokenKind::Opcode, TokenKind::Const]);
    }

    #[test]
    fn named_trap_is_classified_as_trap() {
        assert_eq!(kinds("HALT"), vec![TokenKind::Trap]);
        assert_eq!(kinds("PUTS"), vec![TokenKind::Trap]);
    }

    #[test]
    fn unknown_directive_errors() {
        let err = lex_line(1, ".FOO 1");
        assert!(matches!(err, Err(AsmError::UnrecognizedToken { .. })));
    }

    #[test]
    fn commas_and_whitespace_both_separate_operands() {
        assert_eq!(kinds("ADD R0 R1 R2"), kinds("ADD R0,R1,R2"));
    }
}
