//! Command-line entry point: loads a program image and runs it to
//! completion against the host's standard input and output.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use um_vm::{load_image, Machine};

/// Run a `um` program image.
#[derive(Debug, Parser)]
#[command(name = "um", about = "Universal Machine interpreter")]
struct Args {
    /// Path to the program image (a sequence of big-endian 32-bit words).
    image: PathBuf,

    /// Increase logging verbosity. May be repeated (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            // Usage errors go to stdout here rather than clap's default
            // stderr, so print explicitly instead of calling `error.exit()`.
            println!("{error}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(args.verbose);

    let file = match File::open(&args.image) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("um: failed to open {}: {error}", args.image.display());
            return ExitCode::FAILURE;
        }
    };

    let code = match load_image(file) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("um: failed to load {}: {error}", args.image.display());
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = BufWriter::new(io::stdout());
    let mut machine = Machine::new(code, stdin.lock(), stdout);

    let state = machine.run();
    match state {
        um_vm::MachineState::Halted => ExitCode::SUCCESS,
        um_vm::MachineState::Faulted(fault) => {
            eprintln!("um: machine fault: {fault}");
            ExitCode::FAILURE
        }
        um_vm::MachineState::Running => unreachable!("run() only returns a terminal state"),
    }
}
