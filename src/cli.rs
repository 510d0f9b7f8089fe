use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_GROUP_SIZE, SplitConfig};
use crate::error::SplitError;

/// Split large CSV files into fixed-size groups, replicating the header row
/// into every part.
#[derive(Parser, Debug)]
#[command(name = "splitcsv")]
#[command(version)]
#[command(about = "Splits CSV files into parts of at most a given number of data rows")]
pub struct Cli {
    /// CSV files to split
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,

    /// Data rows per split file
    #[arg(short = 'l', long = "lines", value_name = "N", default_value_t = DEFAULT_GROUP_SIZE)]
    pub lines: u64,

    /// Output directory (default is same as source)
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Emit absolute paths to split files
    #[arg(long = "absolute-paths")]
    pub absolute_paths: bool,

    /// Compute and report output paths without writing any file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Input/output file encoding (a WHATWG label, e.g. utf-8, windows-1252)
    #[arg(short = 'e', long = "encoding", value_name = "NAME", default_value = "utf-8")]
    pub encoding: String,

    /// Enable additional output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Input paths, trimmed, with empty specifications discarded.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    pub fn to_config(&self) -> Result<SplitConfig, SplitError> {
        let mut builder = SplitConfig::builder()
            .group_size(self.lines)
            .absolute_paths(self.absolute_paths)
            .dry_run(self.dry_run)
            .encoding_label(&self.encoding)?;
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_reference_tool() {
        let cli = Cli::parse_from(["splitcsv", "a.csv"]);
        assert_eq!(cli.lines, DEFAULT_GROUP_SIZE);
        assert_eq!(cli.encoding, "utf-8");
        assert!(!cli.dry_run);

        let config = cli.to_config().unwrap();
        assert_eq!(config.group_size(), DEFAULT_GROUP_SIZE);
        assert_eq!(config.encoding(), encoding_rs::UTF_8);
    }

    #[test]
    fn blank_path_specifications_are_discarded() {
        let cli = Cli::parse_from(["splitcsv", "  a.csv  ", "   "]);
        assert_eq!(cli.input_paths(), [PathBuf::from("a.csv")]);
    }

    #[test]
    fn unknown_encoding_is_a_usage_error() {
        let cli = Cli::parse_from(["splitcsv", "-e", "no-such-enc", "a.csv"]);
        assert!(matches!(
            cli.to_config(),
            Err(SplitError::UnknownEncoding(_))
        ));
    }
}
