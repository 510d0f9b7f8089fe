/// One logical CSV record and its origin line.
pub mod row;

/// Streaming byte-to-char decoding for the configured text encoding.
pub mod decode;

/// The streaming CSV row parser.
pub mod reader;

/// Pure row-ordinal to group-number mapping.
pub mod group;

/// Always-quoted row serialization.
pub mod serializer;

/// The per-file split orchestrator.
pub mod splitter;
