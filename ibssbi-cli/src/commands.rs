//! CLI command implementations.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use ibssbi_common::{Loader, Program};
use ibssbi_vm::VmConfig;
use tracing::{debug, info};

use crate::error::CliError;

/// File extension for assembled binaries.
pub const BINARY_EXTENSION: &str = "ibc";

/// Everything `ibssbi` needs to run one program.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub path: PathBuf,
    /// Dump the header and raw body to stderr before running.
    pub debug: bool,
    pub config: VmConfig,
}

/// Load and execute a binary program against stdin/stdout.
pub fn run(opts: &RunOptions) -> Result<(), CliError> {
    let program = read_binary(&opts.path)?;
    if opts.debug {
        eprint!("{}", program.dump());
    }

    info!(
        path = %opts.path.display(),
        size = program.len(),
        stack_capacity = opts.config.stack_capacity,
        max_heap_words = opts.config.max_heap_words,
        "running"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = io::BufWriter::new(stdout.lock());
    ibssbi_vm::run_with_config(&program, opts.config, &mut stdin.lock(), &mut output)?;
    Ok(())
}

/// Assemble a text file to a binary. Returns the path written.
///
/// Without an explicit output, the input's extension is replaced with
/// [`BINARY_EXTENSION`].
pub fn assemble(input: &Path, output: Option<&Path>) -> Result<PathBuf, CliError> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(BINARY_EXTENSION));

    let text = fs::read_to_string(input).map_err(|e| read_error(input, e))?;
    let program = ibssbi_assembler::assemble(&text)?;
    let bytes = program.encode();

    fs::write(&output, &bytes).map_err(|e| CliError::Write {
        path: output.display().to_string(),
        message: e.to_string(),
    })?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        bytes = bytes.len(),
        "assembled"
    );
    Ok(output)
}

/// Disassemble a binary to text, optionally as an offset listing.
pub fn disassemble(input: &Path, offsets: bool) -> Result<String, CliError> {
    let program = read_binary(input)?;
    let text = if offsets {
        ibssbi_assembler::listing(&program)?
    } else {
        ibssbi_assembler::disassemble(&program)?
    };
    Ok(text)
}

/// Read and validate a binary program file.
pub fn read_binary(path: &Path) -> Result<Program, CliError> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    let mut reader = BufReader::new(file);
    let program = Loader::default().load(&mut reader)?;
    Ok(program)
}

fn read_error(path: &Path, err: io::Error) -> CliError {
    CliError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
