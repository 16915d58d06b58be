//! Pass-1 scanner: walks the source line by line, maintains the location
//! counter, registers labels in the [SymbolTable] and records one
//! [LineRecord] per non-empty line for pass 2 to encode.

use crate::error::AsmError;
use crate::lexer::lex_line;
use crate::numeric::parse_value;
use crate::symbol_table::SymbolTable;
use crate::token::{Token, TokenKind};

/// One non-empty, non-comment source line: its tokens, the address its
/// first emitted word will occupy (the PRE-advancement location
/// counter), and enough context to report an error against it.
#[derive(Debug, Clone)]
pub struct LineRecord {
    pub tokens: Vec<Token>,
    pub address: u16,
    pub line_number: usize,
    pub line: String,
}

#[derive(Debug)]
pub struct FirstPassResult {
    pub symbol_table: SymbolTable,
    pub records: Vec<LineRecord>,
}

/// Returns the token that names the operation for a line, skipping a
/// leading LABEL if present.
fn effective_instruction(tokens: &[Token]) -> Option<&Token> {
    match tokens.first() {
        Some(t) if t.kind == TokenKind::Label => tokens.get(1),
        other => other,
    }
}

pub fn run(source: &str) -> Result<FirstPassResult, AsmError> {
    let mut symbol_table = SymbolTable::new();
    let mut records = Vec::new();
    let mut location_counter: Option<u16> = None;
    let mut end_seen = false;
    let mut last_line_number = 0;
    let mut last_line = String::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_number = idx + 1;
        last_line_number = line_number;
        last_line = raw_line.to_string();
        let tokens = lex_line(line_number, raw_line)?;
        if tokens.is_empty() {
            continue;
        }

        log::trace!("line {line_number}: {} token(s)", tokens.len());

        let leading_label = match tokens.first() {
            Some(t) if t.kind == TokenKind::Label => Some(t.clone()),
            _ => None,
        };

        let Some(instruction) = effective_instruction(&tokens) else {
            // A label alone on its own line: bind it and move on.
            let label = leading_label.expect("non-empty line without an instruction token must start with a label");
            let address = location_counter.ok_or_else(|| AsmError::MissingOrig {
                line_number,
                line: raw_line.to_string(),
            })?;
            symbol_table.define(&label.value, address, line_number, raw_line, label.span)?;
            records.push(LineRecord { tokens, address, line_number, line: raw_line.to_string() });
            continue;
        };

        if instruction.kind == TokenKind::Directive && instruction.value == ".END" {
            let address = location_counter.unwrap_or(0);
            records.push(LineRecord { tokens, address, line_number, line: raw_line.to_string() });
            end_seen = true;
            break;
        }

        if instruction.kind == TokenKind::Directive && instruction.value == ".ORIG" {
            let operand = instruction_operand(&tokens, instruction)
                .ok_or_else(|| invalid_operand_count(&tokens, instruction, line_number, raw_line, &[1]))?;
            let value = parse_value(operand, line_number, raw_line)?;
            location_counter = Some(value as u16);
            log::debug!("line {line_number}: origin set to 0x{value:04X}");
            records.push(LineRecord { tokens, address: value as u16, line_number, line: raw_line.to_string() });
            continue;
        }

        let address = location_counter.ok_or_else(|| AsmError::MissingOrig {
            line_number,
            line: raw_line.to_string(),
        })?;

        if let Some(label) = &leading_label {
            symbol_table.define(&label.value, address, line_number, raw_line, label.span)?;
        }

        let advance: u32 = match instruction.kind {
            TokenKind::Directive if instruction.value == ".FILL" => 1,
            TokenKind::Directive if instruction.value == ".BLKW" => {
                let operand = instruction_operand(&tokens, instruction).ok_or_else(|| {
                    invalid_operand_count(&tokens, instruction, line_number, raw_line, &[1])
                })?;
                parse_value(operand, line_number, raw_line)? as u32
            }
            TokenKind::Directive if instruction.value == ".STRINGZ" => {
                let operand = instruction_operand(&tokens, instruction).ok_or_else(|| {
                    invalid_operand_count(&tokens, instruction, line_number, raw_line, &[1])
                })?;
                operand.value.chars().count() as u32 + 1
            }
            TokenKind::Opcode | TokenKind::Trap => 1,
            _ => {
                return Err(AsmError::UnknownInstruction {
                    instruction: instruction.value.clone(),
                    line_number,
                    line: raw_line.to_string(),
                    span: instruction.span,
                });
            }
        };

        location_counter = Some(address.wrapping_add(advance as u16));
        records.push(LineRecord { tokens, address, line_number, line: raw_line.to_string() });
    }

    if !end_seen {
        return Err(AsmError::MissingEnd { line_number: last_line_number, line: last_line });
    }

    Ok(FirstPassResult { symbol_table, records })
}

fn instruction_operand<'a>(tokens: &'a [Token], instruction: &Token) -> Option<&'a Token> {
    let idx = tokens.iter().position(|t| std::ptr::eq(t, instruction))?;
    tokens.get(idx + 1)
}

fn invalid_operand_count(
    tokens: &[Token],
    instruction: &Token,
    line_number: usize,
    line: &str,
    expected: &[usize],
) -> AsmError {
    let idx = tokens.iter().position(|t| std::ptr::eq(t, instruction)).unwrap_or(0);
    AsmError::InvalidOperandCount {
        instruction: instruction.value.clone(),
        found: tokens.len().saturating_sub(idx + 1),
        expected: expected.to_vec(),
        line_number,
        line: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(source: &str) -> Vec<u16> {
        run(source).unwrap().records.into_iter().map(|r| r.address).collect()
    }

    #[test]
    fn origin_sets_location_counter() {
        let result = run(".ORIG x3000\nHALT\n.END").unwrap();
        assert_eq!(result.records[0].address, 0x3000);
        assert_eq!(result.records[1].address, 0x3000);
    }

    #[test]
    fn instructions_advance_by_one() {
        assert_eq!(addresses(".ORIG x3000\nADD R0, R0, R0\nADD R0, R0, R0\n.END"), vec![
            0x3000, 0x3000, 0x3001
        ]);
    }

    #[test]
    fn blkw_and_stringz_advance_correctly() {
        let result = run(".ORIG x3000\n.BLKW 3\nMSG .STRINGZ \"Hi\"\n.END").unwrap();
        // .ORIG, .BLKW (pre=3000), MSG .STRINGZ (pre=3003), .END (post=3006)
        assert_eq!(result.records[1].address, 0x3000);
        assert_eq!(result.records[2].address, 0x3003);
        assert_eq!(result.symbol_table.get("MSG"), Some(0x3003));
        assert_eq!(result.records[3].address, 0x3006);
    }

    #[test]
    fn empty_stringz_advances_by_one() {
        let result = run(".ORIG x3000\n.STRINGZ \"\"\n.END").unwrap();
        assert_eq!(result.records[2].address, 0x3001);
    }

    #[test]
    fn forward_and_backward_label_references_resolve() {
        let result = run(".ORIG x3000\nLOOP ADD R0, R0, #-1\nBRp LOOP\n.END").unwrap();
        assert_eq!(result.symbol_table.get("LOOP"), Some(0x3000));
    }

    #[test]
    fn label_on_its_own_line_binds_without_advancing() {
        let result = run(".ORIG x3000\nLOOP\nHALT\n.END").unwrap();
        assert_eq!(result.symbol_table.get("LOOP"), Some(0x3000));
        assert_eq!(result.records[2].address, 0x3000); // HALT still at origin
    }

    #[test]
    fn duplicate_label_is_an_error() {
        let err = run(".ORIG x3000\nA HALT\nA HALT\n.END");
        assert!(matches!(err, Err(AsmError::DuplicateLabel { .. })));
    }

    #[test]
    fn missing_orig_before_instruction_errors() {
        let err = run("HALT\n.END");
        assert!(matches!(err, Err(AsmError::MissingOrig { .. })));
    }

    #[test]
    fn missing_end_errors() {
        let err = run(".ORIG x3000\nHALT");
        assert!(matches!(err, Err(AsmError::MissingEnd { .. })));
    }

    #[test]
    fn orig_does_not_bind_a_leading_label() {
        let result = run(".ORIG x3000\nHALT\n.END").unwrap();
        assert_eq!(result.symbol_table.get(".ORIG"), None);
    }
}
