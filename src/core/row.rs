/// One logical CSV record: the parsed field values plus the 1-based
/// physical line its first character was read from.
///
/// A row never changes after the parser builds it. Header and data rows
/// share this shape; which role a row plays is the splitter's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
    line: u64,
}

impl Row {
    pub fn new(fields: Vec<String>, line: u64) -> Self {
        Self { fields, line }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Physical line the row started on, counting from 1.
    ///
    /// A row whose quoted fields span several physical lines keeps the
    /// line of its first character.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
