//! The input stream feeding the tokenizer.
//!
//! [§ 13.2.3 The input byte stream](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream)
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! Bytes are pulled from a buffered reader and decoded as UTF-8 one code point
//! at a time, so the document is never held in memory as a whole.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read};

use super::error::TokenizeError;

/// U+FEFF BYTE ORDER MARK, stripped from the start of the stream.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A decoded, newline-normalized stream of code points with lookahead.
pub(super) struct InputStream<R> {
    reader: BufReader<R>,
    /// Code points decoded ahead of the current position.
    lookahead: VecDeque<char>,
    /// Bytes pulled from the reader so far.
    byte_offset: u64,
    /// 1-based line of the last consumed code point.
    line: usize,
    started: bool,
}

impl<R: Read> InputStream<R> {
    pub(super) fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            lookahead: VecDeque::new(),
            byte_offset: 0,
            line: 1,
            started: false,
        }
    }

    /// 1-based line number of the current position.
    pub(super) const fn line(&self) -> usize {
        self.line
    }

    /// "Consume the next input character"
    ///
    /// Returns `Ok(None)` at end of input.
    pub(super) fn next_char(&mut self) -> Result<Option<char>, TokenizeError> {
        let c = match self.lookahead.pop_front() {
            Some(c) => Some(c),
            None => self.decode_normalized()?,
        };
        if c == Some('\n') {
            self.line += 1;
        }
        Ok(c)
    }

    /// Peek at the code point `offset` positions ahead without consuming it.
    pub(super) fn peek(&mut self, offset: usize) -> Result<Option<char>, TokenizeError> {
        while self.lookahead.len() <= offset {
            match self.decode_normalized()? {
                Some(c) => self.lookahead.push_back(c),
                None => return Ok(None),
            }
        }
        Ok(self.lookahead.get(offset).copied())
    }

    /// "If the next few characters are..."
    ///
    /// Checks whether the upcoming characters match `target`, optionally using
    /// ASCII case-insensitive comparison. Nothing is consumed.
    pub(super) fn next_few_characters_are(
        &mut self,
        target: &str,
        case_insensitive: bool,
    ) -> Result<bool, TokenizeError> {
        for (i, expected) in target.chars().enumerate() {
            let Some(actual) = self.peek(i)? else {
                return Ok(false);
            };
            let matches = if case_insensitive {
                actual.eq_ignore_ascii_case(&expected)
            } else {
                actual == expected
            };
            if !matches {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Consume `count` characters previously inspected with [`Self::peek`].
    pub(super) fn skip(&mut self, count: usize) -> Result<(), TokenizeError> {
        for _ in 0..count {
            let _ = self.next_char()?;
        }
        Ok(())
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines." CR LF pairs and lone CRs become a single LF.
    fn decode_normalized(&mut self) -> Result<Option<char>, TokenizeError> {
        loop {
            let c = self.decode_code_point()?;
            if !self.started {
                self.started = true;
                if c == Some(BYTE_ORDER_MARK) {
                    continue;
                }
            }
            if c == Some('\r') {
                if self.peek_byte()? == Some(b'\n') {
                    let _ = self.next_byte()?;
                }
                return Ok(Some('\n'));
            }
            return Ok(c);
        }
    }

    /// Decode a single UTF-8 code point from the reader.
    fn decode_code_point(&mut self) -> Result<Option<char>, TokenizeError> {
        let offset = self.byte_offset;
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(first).ok_or(TokenizeError::InvalidUtf8 { offset })?;

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or(TokenizeError::InvalidUtf8 { offset })?;
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(TokenizeError::InvalidUtf8 { offset })
    }

    fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek_byte()?;
        if byte.is_some() {
            self.reader.consume(1);
            self.byte_offset += 1;
        }
        Ok(byte)
    }
}

/// Number of bytes in the UTF-8 sequence introduced by `first`, or `None` if
/// `first` cannot start a sequence.
const fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(input: &[u8]) -> Result<String, TokenizeError> {
        let mut stream = InputStream::new(input);
        let mut out = String::new();
        while let Some(c) = stream.next_char()? {
            out.push(c);
        }
        Ok(out)
    }

    #[test]
    fn normalizes_newlines() {
        assert_eq!(drain(b"a\r\nb\rc\n").unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        assert_eq!(drain("\u{FEFF}<div>".as_bytes()).unwrap(), "<div>");
        // Only at the very start
        assert_eq!(drain("a\u{FEFF}".as_bytes()).unwrap(), "a\u{FEFF}");
    }

    #[test]
    fn decodes_multibyte_sequences() {
        assert_eq!(drain("Störung ⚠ 🚀".as_bytes()).unwrap(), "Störung ⚠ 🚀");
    }

    #[test]
    fn rejects_invalid_utf8_with_offset() {
        let err = drain(b"ok\xFFnope").unwrap_err();
        assert!(matches!(err, TokenizeError::InvalidUtf8 { offset: 2 }));
    }

    #[test]
    fn rejects_truncated_sequence() {
        let err = drain(&[b'a', 0xE2, 0x9A]).unwrap_err();
        assert!(matches!(err, TokenizeError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn lookahead_does_not_consume() {
        let mut stream = InputStream::new(&b"<!DOCTYPE html>"[..]);
        assert_eq!(stream.next_char().unwrap(), Some('<'));
        assert_eq!(stream.next_char().unwrap(), Some('!'));
        assert!(stream.next_few_characters_are("doctype", true).unwrap());
        assert!(!stream.next_few_characters_are("doctype", false).unwrap());
        stream.skip(7).unwrap();
        assert_eq!(stream.next_char().unwrap(), Some(' '));
    }

    #[test]
    fn tracks_line_numbers() {
        let mut stream = InputStream::new(&b"a\nb\r\nc"[..]);
        while stream.next_char().unwrap().is_some() {}
        assert_eq!(stream.line(), 3);
    }
}
