use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::error::SplitError;

/// Default number of data rows per output file.
pub const DEFAULT_GROUP_SIZE: u64 = 10_000;

/// Line terminator written after every serialized row.
///
/// Chosen once at startup; defaults to the platform convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    Lf,
    Crlf,
}

impl LineTerminator {
    /// The terminator native to the build target.
    pub fn platform() -> Self {
        if cfg!(windows) {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Read-only configuration for one split run.
///
/// Built with [`SplitConfigBuilder`] and shared by every input file of the
/// run. The group size is clamped to a minimum of 1 during the build, so the
/// core pipeline never sees a zero size.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    group_size: u64,
    output_dir: Option<PathBuf>,
    absolute_paths: bool,
    dry_run: bool,
    encoding: &'static Encoding,
    terminator: LineTerminator,
}

impl SplitConfig {
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder::new()
    }

    /// Maximum number of data rows per output file, always ≥ 1.
    pub fn group_size(&self) -> u64 {
        self.group_size
    }

    /// Directory receiving the output files, when overridden.
    ///
    /// `None` means each output file is written alongside its input file.
    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.output_dir.as_ref()
    }

    /// Whether reported output paths are canonicalized to absolute form.
    pub fn absolute_paths(&self) -> bool {
        self.absolute_paths
    }

    /// Whether output files are actually created.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Text encoding used for both reading input and writing output.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn terminator(&self) -> LineTerminator {
        self.terminator
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfigBuilder::new().build()
    }
}

/// Fluent builder for [`SplitConfig`].
#[derive(Debug, Clone)]
pub struct SplitConfigBuilder {
    group_size: u64,
    output_dir: Option<PathBuf>,
    absolute_paths: bool,
    dry_run: bool,
    encoding: &'static Encoding,
    terminator: LineTerminator,
}

impl SplitConfigBuilder {
    pub fn new() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            output_dir: None,
            absolute_paths: false,
            dry_run: false,
            encoding: encoding_rs::UTF_8,
            terminator: LineTerminator::platform(),
        }
    }

    /// Sets the number of data rows per output file.
    pub fn group_size(mut self, size: u64) -> Self {
        self.group_size = size;
        self
    }

    /// Writes all output files into `dir` instead of next to their inputs.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Reports output paths in absolute form.
    pub fn absolute_paths(mut self, yes: bool) -> Self {
        self.absolute_paths = yes;
        self
    }

    /// Computes and reports output paths without creating any file.
    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    /// Sets the text encoding for input and output.
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resolves a WHATWG encoding label such as `utf-8` or `windows-1252`.
    pub fn encoding_label(mut self, label: &str) -> Result<Self, SplitError> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| SplitError::UnknownEncoding(label.to_owned()))?;
        self.encoding = encoding;
        Ok(self)
    }

    pub fn terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn build(self) -> SplitConfig {
        SplitConfig {
            group_size: self.group_size.max(1),
            output_dir: self.output_dir,
            absolute_paths: self.absolute_paths,
            dry_run: self.dry_run,
            encoding: self.encoding,
            terminator: self.terminator,
        }
    }
}

impl Default for SplitConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_size_is_clamped_to_one() {
        let config = SplitConfig::builder().group_size(0).build();
        assert_eq!(config.group_size(), 1);
    }

    #[test]
    fn defaults_match_the_reference_tool() {
        let config = SplitConfig::default();
        assert_eq!(config.group_size(), DEFAULT_GROUP_SIZE);
        assert!(config.output_dir().is_none());
        assert!(!config.absolute_paths());
        assert!(!config.dry_run());
        assert_eq!(config.encoding(), encoding_rs::UTF_8);
    }

    #[test]
    fn encoding_labels_are_resolved() {
        let builder = SplitConfig::builder()
            .encoding_label("windows-1252")
            .unwrap();
        assert_eq!(builder.build().encoding(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        let result = SplitConfig::builder().encoding_label("ebcdic-42");
        assert!(matches!(result, Err(SplitError::UnknownEncoding(_))));
    }
}
