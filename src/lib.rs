//! A two-pass assembler for the LC-3 educational instruction set,
//! featuring:
//! - lexer
//! - pass-1 scanner (symbol table + location counter)
//! - pass-2 encoder (bit-exact instruction/directive encoding)
//!
//! # Example
//!
//! ```
//! use lc3_assembler::assemble;
//!
//! let source = ".ORIG x3000\nADD R0, R1, R2\nHALT\n.END";
//! let image = assemble(source).unwrap();
//! assert_eq!(image.origin, 0x3000);
//! assert_eq!(image.words, vec![0x1042, 0xF025]);
//! ```

pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod image;
pub mod lexer;
pub mod logging;
pub mod numeric;
pub mod symbol_table;
pub mod tables;
pub mod token;

pub use error::AsmError;
pub use image::Image;

/// Run the full pipeline — pass 1 then pass 2 — over in-memory source text.
pub fn assemble(source: &str) -> Result<Image, AsmError> {
    let first_pass = first_pass::run(source)?;
    log::debug!("pass 1 complete: {} line(s) recorded", first_pass.records.len());
    let image = image::assemble(&first_pass)?;
    log::debug!("pass 2 complete: {} word(s) encoded", image.words.len());
    Ok(image)
}
