//! Pass-2 driver: turns a [FirstPassResult] into the final object image —
//! the `.ORIG` origin word followed by one word per encoded line — and
//! serializes it to big-endian bytes for the `.obj` file.

use crate::encoder;
use crate::error::AsmError;
use crate::first_pass::FirstPassResult;
use crate::token::TokenKind;

/// The assembled program: its origin address and the sequence of 16-bit
/// words that follow it in memory.
#[derive(Debug, Clone)]
pub struct Image {
    pub origin: u16,
    pub words: Vec<u16>,
}

impl Image {
    /// Serialize as LC-3 `.obj` bytes: the origin word, then each
    /// instruction/data word, all big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.words.len() + 1) * 2);
        bytes.extend(self.origin.to_be_bytes());
        for word in &self.words {
            bytes.extend(word.to_be_bytes());
        }
        bytes
    }
}

/// Run pass 2 over the records pass 1 produced.
pub fn assemble(first_pass: &FirstPassResult) -> Result<Image, AsmError> {
    let mut origin = None;
    let mut words = Vec::new();

    for record in &first_pass.records {
        let instruction = match record.tokens.first() {
            Some(t) if t.kind == TokenKind::Label => record.tokens.get(1),
            other => other,
        };
        if let Some(t) = instruction {
            if t.kind == TokenKind::Directive && t.value == ".ORIG" {
                origin = Some(record.address);
                continue;
            }
            if t.kind == TokenKind::Directive && t.value == ".END" {
                continue;
            }
        }
        words.extend(encoder::encode_line(record, &first_pass.symbol_table)?);
    }

    Ok(Image { origin: origin.unwrap_or(0), words })
}
