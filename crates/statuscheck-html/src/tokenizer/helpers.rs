//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Token emission ("Emit the current token")
//! - RAWTEXT helpers for raw text elements
//! - Attribute helpers for duplicate detection

use std::borrow::Cow;
use std::io::Read;
use std::mem;

use statuscheck_common::warning::debug_once;

use super::character_reference::unescape;
use super::error::TokenizeError;
use super::state_machine::{HTMLTokenizer, TokenizerState};
use super::token::Token;

/// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
///
/// Elements whose content is read as raw text. Script and RCDATA elements are
/// folded in here since their content is never scraped.
pub const RAW_TEXT_ELEMENTS: [&str; 9] = [
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes", "noscript",
];

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<R: Read> HTMLTokenizer<R> {
    /// "Switch to the X state"
    ///
    /// Transitions to a new state. The next character will be consumed on the
    /// next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// Transitions to a new state without consuming the current character.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// NOTE: HTML tokenizer uses a subset excluding CR (which is normalized earlier).
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        // "U+0009 CHARACTER TABULATION (tab)"
        // "U+000A LINE FEED (LF)"
        // "U+000C FORM FEED (FF)"
        // "U+0020 SPACE"
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl<R: Read> HTMLTokenizer<R> {
    /// "Emit the current token" - queues the token for the consumer.
    ///
    /// Pending text is flushed first so document order is kept. Attribute
    /// values are decoded here, once the tag is complete.
    pub(super) fn emit_token(&mut self) {
        self.finish_attribute();
        let Some(mut token) = self.current_token.take() else {
            return;
        };

        token.map_attribute_values(|value| match unescape(value) {
            Cow::Owned(decoded) => Some(decoded),
            Cow::Borrowed(_) => None,
        });

        self.flush_text();

        if let Token::StartTag {
            ref name,
            self_closing,
            ..
        } = token
        {
            self.last_start_tag_name = Some(name.clone());

            // [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
            // "Switch the tokenizer to the RAWTEXT state."
            // NOTE: There is no tree builder to do this, so the tokenizer
            // detects raw text elements itself.
            if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                self.switch_to(TokenizerState::RAWTEXT);
            }
        }

        self.token_queue.push_back(token);
    }

    /// "Emit the current input character as a character token."
    ///
    /// Characters are buffered and handed out as a single text token.
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.text_buffer.push(c);
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.flush_text();
        self.token_queue.push_back(Token::EndOfFile);
        self.at_eof = true;
    }

    /// Queue the buffered characters as one text token.
    fn flush_text(&mut self) {
        if !self.text_buffer.is_empty() {
            let data = mem::take(&mut self.text_buffer);
            self.token_queue.push_back(Token::Text { data });
        }
    }

    /// Append to the data of the current comment token.
    pub(super) fn append_to_comment(&mut self, s: &str) {
        if let Some(ref mut token) = self.current_token {
            for c in s.chars() {
                token.append_to_comment(c);
            }
        }
    }

    /// "This is an eof-in-comment parse error. Emit the current comment token.
    /// Emit an end-of-file token."
    pub(super) fn emit_comment_at_eof(&mut self) {
        self.log_parse_error("eof-in-comment");
        self.emit_token();
        self.emit_eof_token();
    }

    /// "This is an eof-in-doctype parse error. ... Emit the current DOCTYPE
    /// token. Emit an end-of-file token."
    pub(super) fn emit_doctype_at_eof(&mut self) {
        self.log_parse_error("eof-in-doctype");
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// RAWTEXT Helpers
// =============================================================================

impl<R: Read> HTMLTokenizer<R> {
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    ///
    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the RAWTEXT state."
    pub(super) fn emit_rawtext_end_tag_name_anything_else(&mut self) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = mem::take(&mut self.temporary_buffer);
        self.text_buffer.push_str(&buffer);
        // Discard the current end tag token
        self.current_token = None;
        self.reconsume_in(TokenizerState::RAWTEXT);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl<R: Read> HTMLTokenizer<R> {
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token."
    pub(super) fn begin_attribute(&mut self) {
        self.finish_attribute();
        if let Some(ref mut token) = self.current_token {
            token.start_new_attribute();
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state... if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// The value still has to be consumed, so removal is deferred until the
    /// attribute is complete.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate);

        if is_duplicate {
            self.log_parse_error("duplicate-attribute");
            self.drop_current_attribute = true;
        }
    }

    /// Drop the attribute just completed if it was flagged as a duplicate.
    fn finish_attribute(&mut self) {
        if mem::take(&mut self.drop_current_attribute)
            && let Some(ref mut token) = self.current_token
        {
            token.remove_current_attribute();
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl<R: Read> HTMLTokenizer<R> {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors in HTML are not fatal - the tokenizer recovers and continues.
    /// Each kind is logged once, at debug level.
    pub(super) fn log_parse_error(&self, code: &str) {
        tracing::trace!(code, line = self.input.line(), state = %self.state, "HTML parse error");
        debug_once("HTML Tokenizer", &format!("{code} parse error"));
    }

    /// The terminal error for input that ends inside a tag.
    pub(super) const fn eof_in_tag(&self) -> TokenizeError {
        TokenizeError::UnexpectedEof {
            context: "tag",
            line: self.input.line(),
        }
    }
}
