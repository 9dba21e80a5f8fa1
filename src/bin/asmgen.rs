//! Table-driven generator entry point.
//!
//! Reads the instruction and register tables and writes the generated
//! encoder surface under the output directory.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use asmgen::Generator;

/// Generate the typed x86 encoder surface from NASM-style tables.
#[derive(Parser)]
#[command(name = "asmgen", version, about)]
struct Args {
    /// Instruction-definition table (insns.dat).
    #[arg(long)]
    insns: PathBuf,

    /// Register-definition table (regs.dat).
    #[arg(long)]
    regs: PathBuf,

    /// Output directory for the generated module tree.
    #[arg(long, default_value = "src")]
    out: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let generator = match Generator::load(&args.insns, &args.regs) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    if let Err(err) = generator.emit_all(&args.out) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
