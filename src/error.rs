use std::{io, path::PathBuf};
use thiserror::Error;

/// Machine-readable reason a parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    /// Expected `<` at the start of an element.
    #[error("missing '<'")]
    MissingOpenAngle,

    /// A tag was opened but its `>` never appeared.
    #[error("missing '>'")]
    MissingCloseAngle,

    /// A `<` inside content did not start a closing tag, and nested elements are disabled.
    #[error("closing tag missing '/'")]
    MissingClosingSlash,

    /// Element name starts with whitespace. Examples: `< a>`, `</ a>`, `<>`.
    #[error("invalid element name")]
    InvalidElementNameStart,

    /// Element name contains `=` or `"`. Example: `<a=b>`.
    #[error("could not tokenize element name")]
    InvalidElementName,

    /// The input ended before the element's closing tag.
    #[error("element is never closed")]
    UnterminatedElement,

    /// Example: `<a ="1">`.
    #[error("missing attribute name")]
    MissingAttributeName,

    /// Examples: `<a b=>`, `<a b>`, `<a b "1">`.
    #[error("missing attribute value")]
    MissingAttributeValue,

    /// Opening and closing tag names differ. Example: `<a>x</b>`.
    #[error("tag mismatch")]
    TagMismatch,

    /// The buffer ran out while looking for a delimiter.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// A tag name, attribute or text run is not valid UTF-8.
    #[error("invalid utf-8")]
    InvalidUtf8,

    /// Elements are nested deeper than [`Parser::max_depth`](crate::Parser::max_depth) allows.
    #[error("elements nested too deeply")]
    NestingTooDeep,
}

/// Structural parse failure, with the byte offset it happened at.
///
/// The offset is 0-based and relative to the buffer given to the failing operation:
/// the whole document for [`Parser`](crate::Parser),
/// or the opening-tag text for [`tokenize`](crate::tokenize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    pub(crate) const fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub const fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// 0-based byte offset into the buffer the failing operation was given.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based byte position, as shown to users.
    ///
    /// For errors from [`tokenize`](crate::tokenize), this is the position within the tag text:
    ///
    /// ```
    /// let err = firexml::tokenize(b" a").unwrap_err();
    /// assert_eq!(err.position(), 1);
    /// ```
    pub const fn position(&self) -> usize {
        self.offset + 1
    }

    /// Moves the offset from a sub-slice onto the buffer containing it.
    pub(crate) const fn rebase(self, base: usize) -> Self {
        Self {
            kind: self.kind,
            offset: self.offset + base,
        }
    }

    /// Renders the line of `source` the error points at, with a caret under the failing column.
    ///
    /// `source` must be the same buffer the error was produced from.
    ///
    /// ```
    /// let source = b"<a b=>x</a>";
    /// let err = firexml::parse(source).unwrap_err();
    /// assert_eq!(err.excerpt(source), "line 1, column 6: missing attribute value\n<a b=>x</a>\n     ^");
    /// ```
    pub fn excerpt(&self, source: &[u8]) -> String {
        let offset = self.offset.min(source.len());
        let line_start = source[..offset]
            .iter()
            .rposition(|&ch| ch == b'\n')
            .map_or(0, |nl| nl + 1);
        let line_end = source[offset..]
            .iter()
            .position(|&ch| ch == b'\n' || ch == b'\r')
            .map_or(source.len(), |end| offset + end);
        let line_number = source[..line_start].iter().filter(|&&ch| ch == b'\n').count() + 1;
        // in characters, so the caret lines up under multi-byte text
        let column = String::from_utf8_lossy(&source[line_start..offset]).chars().count();

        format!(
            "line {}, column {}: {}\n{}\n{}^",
            line_number,
            column + 1,
            self.kind,
            String::from_utf8_lossy(&source[line_start..line_end]),
            " ".repeat(column),
        )
    }
}

/// Errors emitted while loading a [`Document`](crate::Document) from a byte source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input")]
    Io(#[from] io::Error),

    #[error("input is empty")]
    EmptyInput,

    #[error(transparent)]
    Parse(#[from] ParseError),
}
