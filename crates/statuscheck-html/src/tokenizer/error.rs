use std::io;

use thiserror::Error;

/// A failure that stops tokenization.
///
/// Recoverable parse errors (stray characters, duplicate attributes) never
/// surface here; they are logged and the tokenizer carries on.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// Reading from the underlying stream failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),

    /// The stream is not valid UTF-8.
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 {
        /// Byte offset where the bad sequence starts.
        offset: u64,
    },

    /// The stream ended inside a construct that cannot be recovered, such as
    /// a start tag cut off before its closing `>`.
    #[error("unexpected end of input inside {context} on line {line}")]
    UnexpectedEof {
        /// What was being tokenized when the input ran out.
        context: &'static str,
        /// 1-based line where the input ended.
        line: usize,
    },
}
