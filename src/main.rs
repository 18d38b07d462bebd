use clap::Parser;
use trendsignal::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
