//! Static keyword tables: opcode mnemonics, trap vectors, register codes
//! and the directive set. Everything here is compile-time constant data
//! indexed by canonical upper-case key, as the LC-3 ISA itself is fixed.

/// Every LC-3 opcode mnemonic, including the eight `BR[nzp]` spellings.
/// This is the full set the lexer accepts as an OPCODE token.
pub const OPCODES: &[&str] = &[
    "ADD", "AND", "NOT", "BR", "BRN", "BRZ", "BRP", "BRNZ", "BRNP", "BRZP", "BRNZP", "JMP", "RET",
    "JSR", "JSRR", "LD", "LDI", "LDR", "LEA", "ST", "STI", "STR", "TRAP", "RTI",
];

/// Named trap vectors and their 8-bit codes.
pub const TRAPS: &[(&str, u8)] = &[
    ("GETC", 0x20),
    ("OUT", 0x21),
    ("PUTS", 0x22),
    ("IN", 0x23),
    ("PUTSP", 0x24),
    ("HALT", 0x25),
];

/// Directive keywords recognized after a leading `.`.
pub const DIRECTIVES: &[&str] = &[".ORIG", ".END", ".BLKW", ".FILL", ".STRINGZ"];

pub fn is_opcode(mnemonic: &str) -> bool {
    OPCODES.contains(&mnemonic)
}

pub fn trap_vector(name: &str) -> Option<u8> {
    TRAPS.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

pub fn is_directive(word: &str) -> bool {
    DIRECTIVES.contains(&word)
}

/// Parse `R0`..`R7` into its 3-bit register code.
pub fn register_code(lexeme: &str) -> Option<u8> {
    let mut chars = lexeme.chars();
    if chars.next()? != 'R' {
        return None;
    }
    let digit = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let n = digit.to_digit(10)?;
    if n <= 7 { Some(n as u8) } else { None }
}

/// The n/z/p condition flags encoded in a `BR...` mnemonic. Bare `BR` is
/// `BRnzp` (unconditional) by LC-3 convention.
pub fn branch_flags(mnemonic: &str) -> Option<(bool, bool, bool)> {
    let suffix = mnemonic.strip_prefix("BR")?;
    if suffix.is_empty() {
        return Some((true, true, true));
    }
    if !suffix.chars().all(|c| matches!(c, 'N' | 'Z' | 'P')) {
        return None;
    }
    Some((
        suffix.contains('N'),
        suffix.contains('Z'),
        suffix.contains('P'),
    ))
}
