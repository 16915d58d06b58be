use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use lc3_assembler::{assemble, logging};

/// Assemble LC-3 source files into big-endian `.obj` images.
#[derive(Parser)]
#[command(name = "lc3-assembler", version, about)]
struct Cli {
    /// Source files to assemble.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Increase logging verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    for input in &cli.inputs {
        if let Err(code) = assemble_one(input) {
            return code;
        }
    }
    ExitCode::SUCCESS
}

fn assemble_one(input: &PathBuf) -> Result<(), ExitCode> {
    log::info!("assembling {}", input.display());

    let source = fs::read_to_string(input).map_err(|e| {
        logging::error(format!("{}: failed to read input: {}", input.display(), e));
        ExitCode::from(1)
    })?;

    let image = assemble(&source).map_err(|e| {
        logging::error(format!("{}:{}", input.display(), e));
        ExitCode::from(2)
    })?;

    let output = output_path(input);
    fs::write(&output, image.to_bytes()).map_err(|e| {
        logging::error(format!("{}: failed to write output: {}", output.display(), e));
        ExitCode::from(3)
    })?;

    log::info!("wrote {}", output.display());
    Ok(())
}

fn output_path(input: &PathBuf) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let mut output = input.clone();
    output.set_file_name(format!("{stem}-assembled.obj"));
    output
}
