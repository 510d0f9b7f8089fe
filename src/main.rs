use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use log::LevelFilter;

use splitcsv::cli::Cli;
use splitcsv::{SplitObserver, Splitter};

/// Prints each created (or would-be-created) output path to stdout, in
/// creation order. Notices and errors go to stderr via the logger.
struct ConsolePaths;

impl SplitObserver for ConsolePaths {
    fn output_file(&mut self, path: &Path) {
        println!("{}", path.display());
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.verbose {
                eprintln!("Error: {e:?}");
            } else {
                eprintln!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    let splitter = Splitter::new(config);
    splitter.run(&cli.input_paths(), &mut ConsolePaths)?;
    Ok(())
}
