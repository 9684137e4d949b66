// src/main.rs
use std::process::ExitCode;

use colorful::Colorful;
use log::LevelFilter;

use tajweedcheck::cli;

fn main() -> ExitCode {
    let args = cli::parse_args();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match cli::run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            ExitCode::from(2)
        }
    }
}
