//! Integration tests for the streaming HTML tokenizer.

use std::io::{self, Read};

use statuscheck_html::tokenizer::TokenizerState;
use statuscheck_html::{HTMLTokenizer, Token, TokenizeError};

/// Helper to tokenize a string and return every token, EOF excluded
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .expect("tokenization failed")
}

/// Reader that hands out a single byte per call
struct OneByteReader<'a> {
    data: &'a [u8],
}

impl Read for OneByteReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.data.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// Reader that fails on the first call
struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

#[test]
fn test_plain_text_is_one_token() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Text { data } if data == "Hello"));
}

#[test]
fn test_empty_input() {
    let mut tokenizer = HTMLTokenizer::new("".as_bytes());
    assert!(matches!(tokenizer.next_token(), Ok(Token::EndOfFile)));
    // EOF repeats
    assert!(matches!(tokenizer.next_token(), Ok(Token::EndOfFile)));
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Doctype { name: Some(n) } if n == "html"));
}

#[test]
fn test_doctype_with_public_identifier() {
    let tokens = tokenize(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN"><p>"#);
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[1], Token::StartTag { name, .. } if name == "p"));
}

#[test]
fn test_start_and_end_tag() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "p"));
    assert!(matches!(&tokens[1], Token::Text { data } if data == "Hi"));
    assert!(matches!(&tokens[2], Token::EndTag { name, .. } if name == "p"));
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DIV CLASS=\"Component\"></Div>");
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "div");
            assert_eq!(attributes[0].name, "class");
            // Values keep their case
            assert_eq!(attributes[0].value, "Component");
        }
        _ => panic!("Expected StartTag token"),
    }
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/><img src=x />");
    assert!(matches!(&tokens[0], Token::StartTag { name, self_closing: true, .. } if name == "br"));
    assert!(matches!(&tokens[1], Token::StartTag { name, self_closing: true, .. } if name == "img"));
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<div a="one" b='two' c=three d>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 4);
            assert_eq!(attributes[0].value, "one");
            assert_eq!(attributes[1].value, "two");
            assert_eq!(attributes[2].value, "three");
            assert_eq!(attributes[3].name, "d");
            assert_eq!(attributes[3].value, "");
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let tokens = tokenize(r#"<div class="component-name" class="component-status">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "component-name");
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(tokens[0].attribute("class"), Some("component-name"));
}

#[test]
fn test_attribute_values_are_decoded() {
    let tokens = tokenize(r#"<a title="Fish &amp; Chips &#x26; &lt;more&gt;">"#);
    assert_eq!(tokens[0].attribute("title"), Some("Fish & Chips & <more>"));
}

#[test]
fn test_text_is_left_raw() {
    let tokens = tokenize("<p>AT&amp;T</p>");
    assert!(matches!(&tokens[1], Token::Text { data } if data == "AT&amp;T"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello --><p>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " hello "));
    assert!(matches!(&tokens[1], Token::StartTag { name, .. } if name == "p"));
}

#[test]
fn test_markup_inside_comment_is_not_tags() {
    let tokens = tokenize(r#"<!-- <div class="component-status">MAJOR</div> -->"#);
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Comment { .. }));
}

#[test]
fn test_bogus_comment() {
    let tokens = tokenize("<?xml version=\"1.0\"?><p>");
    assert!(matches!(&tokens[0], Token::Comment { .. }));
    assert!(matches!(&tokens[1], Token::StartTag { name, .. } if name == "p"));
}

#[test]
fn test_script_content_is_raw_text() {
    let tokens = tokenize(r#"<script>if (a < b) { x = "<div>"; }</script><p>"#);
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "script"));
    assert!(matches!(&tokens[1], Token::Text { data } if data == r#"if (a < b) { x = "<div>"; }"#));
    assert!(matches!(&tokens[2], Token::EndTag { name, .. } if name == "script"));
    assert!(matches!(&tokens[3], Token::StartTag { name, .. } if name == "p"));
}

#[test]
fn test_style_end_tag_requires_matching_name() {
    let tokens = tokenize("<style>a</b></style>");
    assert!(matches!(&tokens[1], Token::Text { data } if data == "a</b>"));
    assert!(matches!(&tokens[2], Token::EndTag { name, .. } if name == "style"));
}

#[test]
fn test_stray_less_than_is_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Text { data } if data == "1 < 2"));
}

#[test]
fn test_less_than_at_eof_is_text() {
    let tokens = tokenize("abc<");
    assert!(matches!(&tokens[0], Token::Text { data } if data == "abc<"));
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert!(matches!(&tokens[0], Token::Text { data } if data == "a\nb\nc"));
}

#[test]
fn test_byte_order_mark_is_skipped() {
    let tokens = tokenize("\u{FEFF}<p>");
    assert_eq!(tokens.len(), 1);
}

#[test]
fn test_eof_in_tag_is_an_error() {
    let mut tokenizer = HTMLTokenizer::new(r#"<p>ok</p><div class="comp"#.as_bytes());
    assert!(matches!(tokenizer.next_token(), Ok(Token::StartTag { .. })));
    assert!(matches!(tokenizer.next_token(), Ok(Token::Text { .. })));
    assert!(matches!(tokenizer.next_token(), Ok(Token::EndTag { .. })));
    let err = tokenizer.next_token().unwrap_err();
    assert!(matches!(err, TokenizeError::UnexpectedEof { context: "tag", line: 1 }));
}

#[test]
fn test_eof_in_tag_reports_line() {
    let err = HTMLTokenizer::new("\n\n<div".as_bytes())
        .find_map(Result::err)
        .expect("expected an error");
    assert_eq!(err.to_string(), "unexpected end of input inside tag on line 3");
}

#[test]
fn test_iterator_stops_after_error() {
    let mut tokenizer = HTMLTokenizer::new("<div class=".as_bytes());
    assert!(matches!(tokenizer.next(), Some(Err(_))));
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_invalid_utf8_is_an_error() {
    let bytes: &[u8] = b"<p>ok\xFF</p>";
    let err = HTMLTokenizer::new(bytes)
        .find_map(Result::err)
        .expect("expected an error");
    assert!(matches!(err, TokenizeError::InvalidUtf8 { offset: 5 }));
}

#[test]
fn test_read_failure_is_an_error() {
    let mut tokenizer = HTMLTokenizer::new(FailingReader);
    assert!(matches!(tokenizer.next_token(), Err(TokenizeError::Io(_))));
}

#[test]
fn test_one_byte_reads_match_bulk_reads() {
    let html = "<!DOCTYPE html>\r\n<div class=\"component\">caf\u{e9} \u{1F600}<!-- c --></div>";
    let bulk = tokenize(html);
    let trickled = HTMLTokenizer::new(OneByteReader {
        data: html.as_bytes(),
    })
    .collect::<Result<Vec<_>, _>>()
    .unwrap();
    assert_eq!(bulk, trickled);
}

#[test]
fn test_state_returns_to_data() {
    let mut tokenizer = HTMLTokenizer::new("<p>".as_bytes());
    assert_eq!(tokenizer.state(), TokenizerState::Data);
    let _ = tokenizer.next_token().unwrap();
    assert_eq!(tokenizer.state(), TokenizerState::Data);
}

#[test]
fn test_token_accessors() {
    let mut tokenizer = HTMLTokenizer::new(r#"<div class="a">x</div>"#.as_bytes());
    let start = tokenizer.next_token().unwrap();
    assert_eq!(start.tag_name(), Some("div"));
    assert_eq!(start.attribute("class"), Some("a"));
    assert_eq!(start.attribute("id"), None);
    assert_eq!(start.text(), None);

    let text = tokenizer.next_token().unwrap();
    assert_eq!(text.text(), Some("x"));
    assert_eq!(text.tag_name(), None);

    let end = tokenizer.next_token().unwrap();
    assert_eq!(end.tag_name(), Some("div"));
    assert!(tokenizer.next_token().unwrap().is_eof());
}

#[test]
fn test_token_display() {
    let tokens = tokenize(r#"<!DOCTYPE html><br class="x"/>hi<!--c--></p>"#);
    let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "DOCTYPE html",
            r#"<br class="x" />"#,
            r#"Text("hi")"#,
            "<!--c-->",
            "</p>",
        ]
    );
}
