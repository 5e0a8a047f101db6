//! HTML tokenizer module.
//!
//! Implements the parts of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard that a scraper needs, over a streaming
//! reader instead of an in-memory string.

/// Character reference decoding per § 13.2.5.72.
pub mod character_reference;
/// Errors that stop tokenization.
pub mod error;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Streaming UTF-8 input with newline normalization.
mod input;
/// Named character reference lookup table per § 13.5.
pub mod named_character_references;
/// HTML tokenizer state machine implementation.
pub mod state_machine;
/// Token types produced by the tokenizer.
pub mod token;

pub use character_reference::unescape;
pub use error::TokenizeError;
pub use state_machine::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
