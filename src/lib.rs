#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # splitcsv

 Splits one or more delimited text (CSV) files into a sequence of smaller
 files, each holding at most a configured number of data rows, with the
 original header row replicated into every part and field quoting preserved
 exactly.

 ## How it works

 - [`crate::core::reader::RowReader`] streams logical CSV rows out of the
   input, tracking the physical line each row started on, with quoted
   fields free to contain delimiters, quote characters and embedded line
   breaks.
 - [`crate::core::group::group_of`] assigns every data row to a 1-based
   group of at most `group_size` rows.
 - [`crate::core::serializer::RowWriter`] renders rows back out fully
   quoted, in the configured encoding and line-terminator convention.
 - [`crate::core::splitter::Splitter`] drives one file end-to-end: it skips empty
   files and files that fit in a single group, and otherwise rewrites the
   stream into `<stem>-<group><extension>` parts, reporting each output
   path in creation order.

 Files that hold `n` data rows produce `ceil(n / group_size)` parts when
 `n > group_size`, and no parts at all otherwise.

 ## Example

 ```no_run
 use std::path::PathBuf;
 use splitcsv::{SplitConfig, Splitter};

 fn main() -> Result<(), splitcsv::SplitError> {
     let config = SplitConfig::builder()
         .group_size(10_000)
         .output_dir("out")
         .build();

     let mut created: Vec<PathBuf> = Vec::new();
     Splitter::new(config).run(&[PathBuf::from("orders.csv")], &mut created)?;

     for path in created {
         println!("{}", path.display());
     }
     Ok(())
 }
 ```
*/

/// Core row-grouping-and-rewriting pipeline.
pub mod core;

/// Run configuration.
pub mod config;

/// Command-line interface for the `splitcsv` binary.
pub mod cli;

/// Error types for split operations.
pub mod error;

#[doc(inline)]
pub use crate::config::{LineTerminator, SplitConfig, SplitConfigBuilder};
#[doc(inline)]
pub use crate::core::splitter::{FileOutcome, SplitObserver, Splitter};
#[doc(inline)]
pub use crate::error::SplitError;
