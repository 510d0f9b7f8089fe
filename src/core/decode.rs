use std::collections::VecDeque;
use std::io::{self, Read};

use encoding_rs::{Decoder, Encoding};

const READ_CHUNK: usize = 8 * 1024;

/// Incremental byte-to-char decoder over any `encoding_rs` encoding.
///
/// Wraps a byte source and yields decoded characters one at a time, pulling
/// and decoding a chunk whenever the pending queue runs dry. Malformed byte
/// sequences decode to U+FFFD, matching `encoding_rs` replacement semantics.
pub struct CharReader<R: Read> {
    inner: R,
    decoder: Decoder,
    pending: VecDeque<char>,
    eof: bool,
}

impl<R: Read> CharReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: encoding.new_decoder(),
            pending: VecDeque::new(),
            eof: false,
        }
    }

    /// Returns the next decoded character, or `None` at end of input.
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(c) = self.pending.pop_front() {
                return Ok(Some(c));
            }
            if self.eof {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut buf = [0u8; READ_CHUNK];
        let n = self.inner.read(&mut buf)?;
        let last = n == 0;

        // Worst case one char per input byte, plus whatever the decoder
        // still holds from a split sequence.
        let mut decoded = String::with_capacity(
            self.decoder
                .max_utf8_buffer_length(n)
                .unwrap_or(READ_CHUNK * 4),
        );
        let (_, _read, _replaced) = self.decoder.decode_to_string(&buf[..n], &mut decoded, last);
        self.pending.extend(decoded.chars());

        if last {
            self.eof = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<R: Read>(mut reader: CharReader<R>) -> String {
        let mut out = String::new();
        while let Some(c) = reader.next_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn utf8_input_is_passed_through() {
        let reader = CharReader::new("héllo,wörld".as_bytes(), encoding_rs::UTF_8);
        assert_eq!(drain(reader), "héllo,wörld");
    }

    #[test]
    fn windows_1252_bytes_are_decoded() {
        // 0xE9 is é in windows-1252.
        let reader = CharReader::new(&b"caf\xe9"[..], encoding_rs::WINDOWS_1252);
        assert_eq!(drain(reader), "café");
    }

    #[test]
    fn empty_input_yields_no_chars() {
        let mut reader = CharReader::new(&b""[..], encoding_rs::UTF_8);
        assert!(reader.next_char().unwrap().is_none());
    }
}
