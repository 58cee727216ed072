//! ibssbi: run an assembled bytecode program.
//!
//! Program output goes to stdout and program input comes from stdin;
//! diagnostics go to stderr. Exits 0 when the program halts, 1 otherwise.

use std::path::PathBuf;

use clap::Parser;
use ibssbi_cli::commands::{self, RunOptions};
use ibssbi_cli::{exit_on_error, logging, parse_args};
use ibssbi_vm::machine::{DEFAULT_MAX_HEAP_WORDS, DEFAULT_STACK_CAPACITY};
use ibssbi_vm::VmConfig;

/// ibssbi - a minimal stack-based bytecode virtual machine
#[derive(Parser, Debug)]
#[command(name = "ibssbi", version)]
#[command(about = "Run an ibssbi bytecode program", long_about = None)]
struct Args {
    /// Print the program header and raw bytes to stderr before running
    #[arg(long)]
    debug: bool,

    /// Evaluation stack capacity, in words
    #[arg(long, default_value_t = DEFAULT_STACK_CAPACITY)]
    stack_capacity: usize,

    /// Maximum number of live heap words
    #[arg(long, default_value_t = DEFAULT_MAX_HEAP_WORDS)]
    max_heap_words: usize,

    /// Binary program to execute
    file: PathBuf,
}

fn main() {
    let args: Args = parse_args();
    logging::init();

    let opts = RunOptions {
        path: args.file,
        debug: args.debug,
        config: VmConfig {
            stack_capacity: args.stack_capacity,
            max_heap_words: args.max_heap_words,
        },
    };
    exit_on_error(commands::run(&opts));
}
