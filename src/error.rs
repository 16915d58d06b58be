//! Diagnostics: a single [AsmError] type used by every stage (lexer,
//! first pass, encoders, image assembler), with a `Display` that prints
//! `<line>: <kind>: <detail>` plus an underlined source excerpt. The
//! caller (the CLI driver) prepends the file path, producing the
//! `<path>:<line>: <kind>: <detail>` form required by the spec.

use colored::Colorize;

use crate::token::Span;

/// An error that can occur during assembly.
#[derive(Debug)]
pub enum AsmError {
    /// A `"..."` string literal was never closed.
    UnterminatedString { line_number: usize, line: String, span: Span },
    /// An unrecognized `\x` escape inside a string literal.
    InvalidEscape { escape: char, line_number: usize, line: String, span: Span },
    /// A fragment matched no token category and was not in label position.
    UnrecognizedToken { text: String, line_number: usize, line: String, span: Span },
    /// A line's leading token is not a label, opcode, trap, or directive.
    UnknownInstruction { instruction: String, line_number: usize, line: String, span: Span },
    /// `.ORIG` was missing before the first instruction.
    MissingOrig { line_number: usize, line: String },
    /// `.END` was missing at end of input.
    MissingEnd { line_number: usize, line: String },
    /// A label was defined more than once.
    DuplicateLabel { label: String, line_number: usize, line: String, span: Span },
    /// An operand referenced a label absent from the symbol table.
    UndefinedLabel { label: String, line_number: usize, line: String, span: Span },
    /// Wrong number of operands for an opcode/directive.
    InvalidOperandCount {
        instruction: String,
        found: usize,
        expected: Vec<usize>,
        line_number: usize,
        line: String,
    },
    /// An operand was present but of the wrong shape (not a register,
    /// not a number, etc.) for its position.
    InvalidOperand { operand: String, line_number: usize, line: String, span: Span },
    /// A numeric operand (immediate or PC-relative offset) did not fit
    /// its field width.
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
        line_number: usize,
        line: String,
        span: Span,
    },
    /// The source file could not be read.
    ReadError { path: String, detail: String },
    /// The object file could not be written.
    WriteError { path: String, detail: String },
}

impl std::error::Error for AsmError {}

fn underline(line: &str, span: Span) -> String {
    let mut underline: Vec<char> = vec![' '; line.chars().count()];
    for i in span.start..span.end {
        if i < underline.len() {
            underline[i] = '^';
        }
    }
    underline.into_iter().collect()
}

fn with_context(
    f: &mut std::fmt::Formatter<'_>,
    line_number: usize,
    line: &str,
    span: Option<Span>,
) -> std::fmt::Result {
    write!(f, "{}\t{}", line_number, line)?;
    if let Some(span) = span {
        writeln!(f)?;
        write!(f, "\t{}", underline(line, span).green())?;
    }
    Ok(())
}

impl std::fmt::Display for AsmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsmError::UnterminatedString { line_number, line, span } => {
                writeln!(f, "{}: lexical: unterminated string literal", line_number)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::InvalidEscape { escape, line_number, line, span } => {
                writeln!(f, "{}: lexical: invalid escape sequence \\{}", line_number, escape)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::UnrecognizedToken { text, line_number, line, span } => {
                writeln!(f, "{}: lexical: unrecognized token \"{}\"", line_number, text)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::UnknownInstruction { instruction, line_number, line, span } => {
                writeln!(f, "{}: structural: unknown instruction \"{}\"", line_number, instruction)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::MissingOrig { line_number, line } => {
                writeln!(f, "{}: structural: missing .ORIG directive before first instruction", line_number)?;
                with_context(f, *line_number, line, None)
            }
            AsmError::MissingEnd { line_number, line } => {
                writeln!(f, "{}: structural: missing .END directive at end of input", line_number)?;
                with_context(f, *line_number, line, None)
            }
            AsmError::DuplicateLabel { label, line_number, line, span } => {
                writeln!(f, "{}: structural: duplicate label \"{}\"", line_number, label)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::UndefinedLabel { label, line_number, line, span } => {
                writeln!(f, "{}: structural: undefined label \"{}\"", line_number, label)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::InvalidOperandCount { instruction, found, expected, line_number, line } => {
                writeln!(
                    f,
                    "{}: semantic: invalid operand count for \"{}\": found {}, expected {:?}",
                    line_number, instruction, found, expected
                )?;
                with_context(f, *line_number, line, None)
            }
            AsmError::InvalidOperand { operand, line_number, line, span } => {
                writeln!(f, "{}: semantic: invalid operand \"{}\"", line_number, operand)?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::OutOfRange { field, value, min, max, line_number, line, span } => {
                writeln!(
                    f,
                    "{}: semantic: {} out of range: {} (expected {}..={})",
                    line_number, field, value, min, max
                )?;
                with_context(f, *line_number, line, Some(*span))
            }
            AsmError::ReadError { path, detail } => {
                write!(f, "I/O: failed to read \"{}\": {}", path, detail)
            }
            AsmError::WriteError { path, detail } => {
                write!(f, "I/O: failed to write \"{}\": {}", path, detail)
            }
        }
    }
}
