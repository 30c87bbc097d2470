//! *firexml* is a tiny, single-pass [XML 1.0](https://www.w3.org/TR/xml/) element parser
//! that turns a byte buffer into an owned tree of elements.
//!
//! # Example
//! ```rust
//! let doc = firexml::parse(br#"<Test kind="greeting">hello, world!</Test>"#).unwrap();
//! let root = doc.root();
//! assert_eq!(root.tag(), "Test");
//! assert_eq!(root.inner_text(), "hello, world!");
//! assert_eq!(root.attribute("kind"), Some("greeting"));
//! ```
//!
//! # What it understands
//! One root element, its attributes, its text, and elements nested inside it:
//!
//! ```text
//! <tagName attr1="v1" attr2 = "v2">text <child>more text</child></tagName>
//! ```
//!
//! Only whitespace, `=` and `"` mean anything inside a tag.
//! Names aren't checked against the XML name grammar, and values and text are kept raw.
//!
//! Every malformed input is reported as a [`ParseError`] carrying a [`ParseErrorKind`]
//! and a byte offset; [`ParseError::excerpt`] points a caret at the offending byte.
//!
//! # Note
//! Declarations, comments, CDATA, processing instructions, self-closing tags,
//! entities and single-quoted attribute values aren't supported.

mod document;
mod error;
mod loader;
mod parser;
mod scanner;
mod tokenizer;

pub use document::{Attribute, Document, Node, NodeId, NodeRef, Text};
pub use error::{LoadError, ParseError, ParseErrorKind};
pub use parser::{Parser, DEFAULT_MAX_DEPTH};
pub use scanner::Cursor;
pub use tokenizer::{tokenize, OpeningTag};

/// Parses `xml` with default settings.
///
/// Shorthand for `Parser::new(xml).parse()`.
pub fn parse(xml: &[u8]) -> Result<Document, ParseError> {
    Parser::new(xml).parse()
}
