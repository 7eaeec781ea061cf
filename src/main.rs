use clap::Parser;
use sentrade::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
