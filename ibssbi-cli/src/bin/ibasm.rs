//! ibasm: assemble and disassemble ibssbi programs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ibssbi_cli::{commands, exit_on_error, logging, parse_args};

#[derive(Parser, Debug)]
#[command(name = "ibasm", version)]
#[command(about = "Assemble and disassemble ibssbi programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a text file to a binary program
    Assemble {
        /// Assembly source
        input: PathBuf,

        /// Output path (defaults to the input with an .ibc extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Disassemble a binary program to text on stdout
    Disassemble {
        /// Binary program
        input: PathBuf,

        /// Prefix each instruction with its byte offset
        #[arg(long)]
        offsets: bool,
    },
}

fn main() {
    let cli: Cli = parse_args();
    logging::init();

    let result = match cli.command {
        Command::Assemble { input, output } => {
            commands::assemble(&input, output.as_deref()).map(|written| {
                eprintln!("assembled {} -> {}", input.display(), written.display());
            })
        }
        Command::Disassemble { input, offsets } => {
            commands::disassemble(&input, offsets).map(|text| print!("{text}"))
        }
    };
    exit_on_error(result);
}
