use std::fs::File;
use std::io::{BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::core::decode::CharReader;
use crate::core::row::Row;
use crate::error::SplitError;

/// A streaming CSV row reader.
///
/// Produces one [`Row`] per logical CSV record, in a single forward pass,
/// without buffering the input. Each row carries the 1-based physical line
/// it started on; a quoted field may contain delimiters, quote characters
/// and embedded line breaks, so one logical row can span several physical
/// lines and the line counter tracks the lines actually consumed.
///
/// Parsing rules:
/// - a field opening with `"` runs to the next lone `"`; a doubled `""`
///   inside decodes to one quote character,
/// - unquoted fields end at the first `,` or line terminator,
/// - `\n`, `\r` and `\r\n` all terminate a line,
/// - physical lines with no content at all are skipped,
/// - input ending inside a quoted field is a fatal parse error carrying
///   the line the field began on.
///
/// The sequence is not restartable. A second pass reopens the source.
///
/// # Examples
///
/// ```
/// use splitcsv::core::reader::RowReaderBuilder;
///
/// let data = "id,name\n1,\"Doe, Jane\"\n";
/// let mut rows = RowReaderBuilder::new().from_reader(data.as_bytes());
///
/// let header = rows.next().unwrap().unwrap();
/// assert_eq!(header.fields(), ["id", "name"]);
/// assert_eq!(header.line(), 1);
///
/// let row = rows.next().unwrap().unwrap();
/// assert_eq!(row.fields(), ["1", "Doe, Jane"]);
/// assert_eq!(row.line(), 2);
///
/// assert!(rows.next().is_none());
/// ```
pub struct RowReader<R: Read> {
    chars: CharReader<R>,
    path: PathBuf,
    peeked: Option<char>,
    /// Physical line of the next character to be consumed, 1-based.
    line: u64,
    done: bool,
}

impl<R: Read> RowReader<R> {
    fn peek(&mut self) -> Result<Option<char>, SplitError> {
        if self.peeked.is_none() {
            self.peeked = self
                .chars
                .next_char()
                .map_err(|e| SplitError::io(&self.path, e))?;
        }
        Ok(self.peeked)
    }

    fn bump(&mut self) -> Result<Option<char>, SplitError> {
        self.peek()?;
        Ok(self.peeked.take())
    }

    /// Consumes one line terminator (`\n`, `\r` or `\r\n`) and advances
    /// the physical line counter.
    fn consume_terminator(&mut self) -> Result<(), SplitError> {
        if self.bump()? == Some('\r') && self.peek()? == Some('\n') {
            self.bump()?;
        }
        self.line += 1;
        Ok(())
    }

    /// Reads a quoted field body, the opening quote already consumed.
    fn read_quoted(&mut self, field: &mut String, opened_on: u64) -> Result<(), SplitError> {
        loop {
            match self.bump()? {
                None => return Err(SplitError::UnterminatedQuote { line: opened_on }),
                Some('"') => {
                    if self.peek()? == Some('"') {
                        self.bump()?;
                        field.push('"');
                    } else {
                        return Ok(());
                    }
                }
                Some('\n') => {
                    field.push('\n');
                    self.line += 1;
                }
                Some('\r') => {
                    field.push('\r');
                    if self.peek()? == Some('\n') {
                        self.bump()?;
                        field.push('\n');
                    }
                    self.line += 1;
                }
                Some(c) => field.push(c),
            }
        }
    }

    fn parse_row(&mut self) -> Result<Option<Row>, SplitError> {
        // Skip physical lines with no content at all.
        loop {
            match self.peek()? {
                None => return Ok(None),
                Some('\n' | '\r') => self.consume_terminator()?,
                Some(_) => break,
            }
        }

        let row_line = self.line;
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut at_field_start = true;

        loop {
            match self.peek()? {
                None => {
                    fields.push(mem::take(&mut field));
                    break;
                }
                Some(',') => {
                    self.bump()?;
                    fields.push(mem::take(&mut field));
                    at_field_start = true;
                }
                Some('\n' | '\r') => {
                    self.consume_terminator()?;
                    fields.push(mem::take(&mut field));
                    break;
                }
                Some('"') if at_field_start => {
                    let opened_on = self.line;
                    self.bump()?;
                    self.read_quoted(&mut field, opened_on)?;
                    at_field_start = false;
                }
                Some(c) => {
                    self.bump()?;
                    field.push(c);
                    at_field_start = false;
                }
            }
        }

        Ok(Some(Row::new(fields, row_line)))
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<Row, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.parse_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Builder for [`RowReader`].
#[derive(Debug, Clone)]
pub struct RowReaderBuilder {
    encoding: &'static Encoding,
}

impl RowReaderBuilder {
    pub fn new() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Sets the text encoding the input bytes are decoded with.
    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Creates a reader over any byte source.
    pub fn from_reader<R: Read>(self, rdr: R) -> RowReader<R> {
        RowReader {
            chars: CharReader::new(rdr, self.encoding),
            path: PathBuf::from("-"),
            peeked: None,
            line: 1,
            done: false,
        }
    }

    /// Opens `path` and creates a reader over its contents.
    pub fn from_path(self, path: impl AsRef<Path>) -> Result<RowReader<BufReader<File>>, SplitError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SplitError::io(path, e))?;
        let mut reader = self.from_reader(BufReader::new(file));
        reader.path = path.to_path_buf();
        Ok(reader)
    }
}

impl Default for RowReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(data: &str) -> Vec<Row> {
        RowReaderBuilder::new()
            .from_reader(data.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn plain_rows_are_split_on_commas() {
        let rows = read_all("a,b,c\n1,2,3\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields(), ["a", "b", "c"]);
        assert_eq!(rows[1].fields(), ["1", "2", "3"]);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let rows = read_all("\"He said \"\"hi\"\", y'know\",plain\n");
        assert_eq!(rows[0].fields(), ["He said \"hi\", y'know", "plain"]);
    }

    #[test]
    fn quoted_fields_may_span_physical_lines() {
        let rows = read_all("head\n\"line one\nline two\",x\ntail\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].fields(), ["line one\nline two", "x"]);
        assert_eq!(rows[1].line(), 2);
        // The embedded newline consumed a physical line.
        assert_eq!(rows[2].line(), 4);
    }

    #[test]
    fn line_numbers_start_at_one() {
        let rows = read_all("a\nb\nc");
        let lines: Vec<u64> = rows.iter().map(Row::line).collect();
        assert_eq!(lines, [1, 2, 3]);
    }

    #[test]
    fn crlf_terminators_are_consumed_as_one() {
        let rows = read_all("a,b\r\n1,2\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields(), ["1", "2"]);
        assert_eq!(rows[1].line(), 2);
    }

    #[test]
    fn blank_lines_are_skipped_but_counted() {
        let rows = read_all("a\n\n\nb\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].line(), 4);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(read_all("").is_empty());
    }

    #[test]
    fn missing_final_terminator_still_yields_the_row() {
        let rows = read_all("a,b\n1,2");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields(), ["1", "2"]);
    }

    #[test]
    fn trailing_empty_field_is_preserved() {
        let rows = read_all("a,b,\n");
        assert_eq!(rows[0].fields(), ["a", "b", ""]);
    }

    #[test]
    fn unterminated_quote_reports_the_opening_line() {
        let err = RowReaderBuilder::new()
            .from_reader("ok\n\"never closed".as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        match err {
            SplitError::UnterminatedQuote { line } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reader_is_fused_after_an_error() {
        let mut rows = RowReaderBuilder::new().from_reader("\"open".as_bytes());
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }

    #[test]
    fn non_utf8_encodings_are_decoded() {
        let reader = RowReaderBuilder::new()
            .encoding(encoding_rs::WINDOWS_1252)
            .from_reader(&b"caf\xe9,th\xe9\n"[..]);
        let rows = reader.collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(rows[0].fields(), ["café", "thé"]);
    }
}
