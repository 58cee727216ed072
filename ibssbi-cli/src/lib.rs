//! Shared plumbing for the `ibssbi` and `ibasm` binaries.
//!
//! Exit codes, for both binaries:
//! - 0: Success (or `--help` / `--version`)
//! - 1: Usage, file, load, assembly or runtime error

pub mod commands;
pub mod error;
pub mod logging;

pub use error::CliError;

use std::process;

/// Print `error: <message>` and exit 1 if `result` failed.
pub fn exit_on_error(result: Result<(), CliError>) {
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Parse arguments, exiting 0 for help/version and 1 for usage errors.
pub fn parse_args<P: clap::Parser>() -> P {
    match P::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    }
}
