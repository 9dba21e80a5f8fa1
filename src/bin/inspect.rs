//! Artifact-bundle inspector entry point.
//!
//! Lists each member of a compiled-artifact archive together with its
//! defined-symbol count. Stub front end for the eventual compiler driver.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use asmgen::ArtifactBundle;

/// List members of a compiled-artifact bundle.
#[derive(Parser)]
#[command(name = "inspect", version, about)]
struct Args {
    /// Archive of compiled objects (`ar` format).
    bundle: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match ArtifactBundle::open(&args.bundle) {
        Ok(bundle) => {
            for member in bundle.members() {
                println!("{} {}", member.name, member.symbol_count);
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
