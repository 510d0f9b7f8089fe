use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::SplitConfig;
use crate::core::group::group_of;
use crate::core::reader::{RowReader, RowReaderBuilder};
use crate::core::row::Row;
use crate::core::serializer::{RowWriter, RowWriterBuilder};
use crate::error::SplitError;

/// Receives the path of every output file as it is created, in creation
/// order. In dry-run mode the paths are reported without being created.
pub trait SplitObserver {
    fn output_file(&mut self, path: &Path);
}

/// Collects reported paths; handy in tests and for callers that post-process
/// the file set.
impl SplitObserver for Vec<PathBuf> {
    fn output_file(&mut self, path: &Path) {
        self.push(path.to_path_buf());
    }
}

/// Per-file result of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Zero-length input, or input yielding no rows at all.
    SkippedEmpty,
    /// The only row was consumed as the header; nothing to split.
    SkippedNoData,
    /// All data rows fit in a single group; no output was written.
    NotSplit,
    /// The file was split into `files` parts holding `rows` data rows.
    Split { files: u64, rows: u64 },
}

/// What the counting pre-pass learned about a file.
enum Probe {
    NoRows,
    HeaderOnly,
    FitsOneGroup,
    NeedsSplit,
}

/// An output file currently receiving rows. `writer` is `None` in dry-run
/// mode; the path is still the output-of-record.
struct OpenGroup {
    path: PathBuf,
    writer: Option<RowWriter<BufWriter<File>>>,
}

impl OpenGroup {
    fn write_row(&mut self, fields: &[String]) -> Result<(), SplitError> {
        if let Some(writer) = &mut self.writer {
            writer
                .write_row(fields)
                .map_err(|e| SplitError::io(&self.path, e))?;
        }
        Ok(())
    }

    /// Flushes and releases the file handle.
    fn finish(self) -> Result<(), SplitError> {
        if let Some(writer) = self.writer {
            writer
                .into_inner()
                .map(drop)
                .map_err(|e| SplitError::io(&self.path, e))?;
        }
        Ok(())
    }
}

/// Splits CSV files into fixed-size groups of data rows, replicating the
/// header row into every output file.
///
/// One input file is processed in two passes over the same source. The
/// first pass parses just far enough to decide whether any data row falls
/// outside group 1; files that fit in a single group are skipped without
/// writing anything. The second pass reopens the file and rewrites it,
/// rotating to a fresh output file at every group boundary. Rows stream
/// through one at a time; nothing is buffered beyond the current row.
///
/// Processing is strictly sequential. The first parse or structure error
/// aborts the file (and the run); output files already written stay on disk
/// for diagnosis, with their writers flushed and closed on the way out.
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Processes every input path in order, aborting on the first failure.
    pub fn run(
        &self,
        paths: &[PathBuf],
        observer: &mut dyn SplitObserver,
    ) -> Result<(), SplitError> {
        if paths.is_empty() {
            return Err(SplitError::MissingInput);
        }
        for path in paths {
            info!("Processing: {}", path.display());
            self.split_file(path, observer)?;
        }
        Ok(())
    }

    /// Processes one input file end-to-end and reports what happened to it.
    pub fn split_file(
        &self,
        path: &Path,
        observer: &mut dyn SplitObserver,
    ) -> Result<FileOutcome, SplitError> {
        let start = Instant::now();

        let metadata = fs::metadata(path).map_err(|e| SplitError::io(path, e))?;
        if metadata.len() == 0 {
            warn!("Skipping empty file: {}", path.display());
            return Ok(FileOutcome::SkippedEmpty);
        }

        match self.probe(path)? {
            Probe::NoRows => {
                warn!("Skipping empty file: {}", path.display());
                Ok(FileOutcome::SkippedEmpty)
            }
            Probe::HeaderOnly => {
                warn!("Skipping file with no data rows: {}", path.display());
                Ok(FileOutcome::SkippedNoData)
            }
            Probe::FitsOneGroup => {
                info!("{}: did not need splitting.", path.display());
                Ok(FileOutcome::NotSplit)
            }
            Probe::NeedsSplit => {
                let outcome = self.rewrite(path, observer)?;
                if let FileOutcome::Split { files, rows } = outcome {
                    info!(
                        "{}: {} total row(s) across {} file(s); time taken = {:?}",
                        path.display(),
                        rows,
                        files,
                        start.elapsed()
                    );
                }
                Ok(outcome)
            }
        }
    }

    /// Counting pre-pass: parses only far enough to learn whether any data
    /// row lands outside group 1. A second pass reopens the source.
    fn probe(&self, path: &Path) -> Result<Probe, SplitError> {
        let mut rows = self.open_reader(path)?;
        if rows.next().transpose()?.is_none() {
            return Ok(Probe::NoRows);
        }

        let mut count: u64 = 0;
        for row in rows {
            row?;
            count += 1;
            if count > self.config.group_size() {
                return Ok(Probe::NeedsSplit);
            }
        }
        if count == 0 {
            Ok(Probe::HeaderOnly)
        } else {
            Ok(Probe::FitsOneGroup)
        }
    }

    /// Second pass: streams data rows into output files, rotating at every
    /// group boundary.
    fn rewrite(
        &self,
        path: &Path,
        observer: &mut dyn SplitObserver,
    ) -> Result<FileOutcome, SplitError> {
        let mut rows = self.open_reader(path)?;
        let header = match rows.next().transpose()? {
            Some(row) => row,
            // The probe saw rows; a file shrinking between passes is the
            // only way here.
            None => return Ok(FileOutcome::SkippedEmpty),
        };

        let mut current: Option<OpenGroup> = None;
        let result = self.write_groups(path, rows, &header, &mut current, observer);

        match result {
            Ok(outcome) => {
                if let Some(open) = current.take() {
                    open.finish()?;
                }
                Ok(outcome)
            }
            Err(e) => {
                // Close the writer on the error path too, so the partial
                // output stays readable for diagnosis.
                if let Some(open) = current.take() {
                    if let Err(close_err) = open.finish() {
                        warn!("While closing output after failure: {close_err}");
                    }
                }
                Err(e)
            }
        }
    }

    fn write_groups(
        &self,
        path: &Path,
        rows: RowReader<impl Read>,
        header: &Row,
        current: &mut Option<OpenGroup>,
        observer: &mut dyn SplitObserver,
    ) -> Result<FileOutcome, SplitError> {
        let group_size = self.config.group_size();
        let mut prev_group = 0u64;
        let mut ordinal = 0u64;
        let mut files = 0u64;

        for row in rows {
            let row = row?;
            let group = group_of(ordinal, group_size);

            if group != prev_group {
                if let Some(open) = current.take() {
                    open.finish()?;
                }
                *current = Some(self.open_group(path, group, header, observer)?);
                files += 1;
                prev_group = group;
            }

            if row.len() != header.len() {
                return Err(SplitError::UnevenRow {
                    path: path.to_path_buf(),
                    line: row.line(),
                    expected: header.len(),
                    actual: row.len(),
                });
            }

            // The rotation branch above guarantees an open group here.
            if let Some(open) = current.as_mut() {
                open.write_row(row.fields())?;
            }
            ordinal += 1;
        }

        Ok(FileOutcome::Split {
            files,
            rows: ordinal,
        })
    }

    /// Opens the output file for `group`, writes the header and reports the
    /// path. In dry-run mode no file is created, but the path is still
    /// computed and reported.
    fn open_group(
        &self,
        input: &Path,
        group: u64,
        header: &Row,
        observer: &mut dyn SplitObserver,
    ) -> Result<OpenGroup, SplitError> {
        let out_path = self.output_path(input, group);
        debug!("Opening group {} -> {}", group, out_path.display());

        let writer = if self.config.dry_run() {
            None
        } else {
            let mut writer = RowWriterBuilder::new()
                .encoding(self.config.encoding())
                .terminator(self.config.terminator())
                .from_path(&out_path)?;
            writer
                .write_row(header.fields())
                .map_err(|e| SplitError::io(&out_path, e))?;
            Some(writer)
        };

        let reported = if self.config.absolute_paths() {
            std::path::absolute(&out_path).map_err(|e| SplitError::io(&out_path, e))?
        } else {
            out_path.clone()
        };
        observer.output_file(&reported);

        Ok(OpenGroup {
            path: out_path,
            writer,
        })
    }

    /// `<stem>-<group><extension>` in the resolved output directory.
    fn output_path(&self, input: &Path, group: u64) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match input.extension() {
            Some(ext) => format!("{stem}-{group}.{}", ext.to_string_lossy()),
            None => format!("{stem}-{group}"),
        };
        let dir = match self.config.output_dir() {
            Some(dir) => dir.clone(),
            None => input.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
        };
        dir.join(name)
    }

    fn open_reader(&self, path: &Path) -> Result<RowReader<BufReader<File>>, SplitError> {
        RowReaderBuilder::new()
            .encoding(self.config.encoding())
            .from_path(path)
    }
}
