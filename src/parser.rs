use crate::{
    document::{Document, NodeId, Text, TreeBuilder},
    error::{ParseError, ParseErrorKind},
    scanner::{is_whitespace, Cursor},
    tokenizer::tokenize,
};

/// Default limit for [`Parser::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parses one root element (and any elements nested in it) out of a byte buffer.
///
/// # Example
/// ```rust
/// let doc = firexml::Parser::new(b"<greeting lang=\"en\">hello, world!</greeting>")
///     .parse()
///     .unwrap();
/// assert_eq!(doc.root().tag(), "greeting");
/// assert_eq!(doc.root().attribute("lang"), Some("en"));
/// ```
pub struct Parser<'buf> {
    // State
    cursor: Cursor<'buf>,
    tree: TreeBuilder,

    // Settings
    trim: bool,
    max_depth: usize,
}

impl<'buf> Parser<'buf> {
    pub fn new(buf: &'buf [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
            tree: TreeBuilder::default(),

            trim: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Enables or disables trimming whitespace off both ends of every inner text.
    ///
    /// Defaults to disabled (`false`), keeping inner text byte-for-byte.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Sets how many levels of child elements may appear below the root.
    ///
    /// With `0`, only the root is parsed and any `<` in its content
    /// that doesn't start the closing tag is an error.
    ///
    /// Defaults to [`DEFAULT_MAX_DEPTH`].
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Parses the root element. Anything after its closing tag is ignored.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        self.cursor.consume_whitespace();
        let root = match self.parse_node(None, 0) {
            Ok(root) => root,
            Err(e) => {
                log::debug!(target: "firexml::parser", "parse failed: {}", e);
                return Err(e);
            }
        };

        let trailing = self.cursor.remaining();
        if trailing.iter().any(|&ch| !is_whitespace(ch)) {
            log::debug!(
                target: "firexml::parser",
                "ignoring {} trailing bytes after root element",
                trailing.len()
            );
        }
        Ok(self.tree.finish(root))
    }

    fn parse_node(&mut self, parent: Option<NodeId>, depth: usize) -> Result<NodeId, ParseError> {
        // consume '<'
        if self.cursor.peek() != Some(b'<') {
            return Err(ParseError::new(
                ParseErrorKind::MissingOpenAngle,
                self.cursor.position(),
            ));
        }
        self.cursor.consume(1);

        let tag_start = self.cursor.position();
        let tag_text = self.capture_tag()?;
        let (name, attributes) = tokenize(tag_text)
            .map_err(|e| e.rebase(tag_start))?
            .into_parts();

        log::trace!(target: "firexml::parser", "open <{}> at byte {}", name, tag_start - 1);
        let id = self.tree.open(name, attributes, parent);

        let mut content = Text::default();
        loop {
            let text_start = self.cursor.position();
            let text = self.cursor.capture_until(b'<').map_err(|e| {
                ParseError::new(ParseErrorKind::UnterminatedElement, e.offset())
            })?;
            content.push_str(Text::from_utf8(text, text_start)?.as_str());

            if self.cursor.starts_with(b"</") {
                break;
            }
            if depth >= self.max_depth {
                let kind = if self.max_depth == 0 {
                    ParseErrorKind::MissingClosingSlash
                } else {
                    ParseErrorKind::NestingTooDeep
                };
                return Err(ParseError::new(kind, self.cursor.position()));
            }
            self.parse_node(Some(id), depth + 1)?;
        }

        self.parse_closing(id)?;
        if self.trim {
            content = Text::from(content.trim());
        }
        self.tree.set_inner_text(id, content);
        Ok(id)
    }

    /// Parses `</name>` and checks it against the element's own name.
    fn parse_closing(&mut self, id: NodeId) -> Result<(), ParseError> {
        self.cursor.consume(2);

        // `</ name>` is not allowed
        let name_start = self.cursor.position();
        if self.cursor.peek().map_or(false, is_whitespace) {
            return Err(ParseError::new(
                ParseErrorKind::InvalidElementNameStart,
                name_start,
            ));
        }

        let closing = self.capture_tag()?;
        if closing != self.tree.tag(id).as_bytes() {
            log::debug!(
                target: "firexml::parser",
                "tag mismatch: '{}' and '{}'",
                self.tree.tag(id),
                String::from_utf8_lossy(closing)
            );
            return Err(ParseError::new(ParseErrorKind::TagMismatch, name_start));
        }

        log::trace!(target: "firexml::parser", "close </{}>", self.tree.tag(id));
        Ok(())
    }

    /// Captures up to `>` and steps over it.
    fn capture_tag(&mut self) -> Result<&'buf [u8], ParseError> {
        let text = self
            .cursor
            .capture_until(b'>')
            .map_err(|e| ParseError::new(ParseErrorKind::MissingCloseAngle, e.offset()))?;
        self.cursor.consume(1);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn kind(xml: &str) -> ParseErrorKind {
        parse(xml.as_bytes()).unwrap_err().kind()
    }

    fn attrs(doc: &Document) -> Vec<(&str, &str)> {
        doc.root()
            .attributes()
            .iter()
            .map(|a| (a.name(), a.value()))
            .collect()
    }

    #[test]
    fn single_element() {
        let doc = parse(br#"<a b="1" c="2">text content</a>"#).unwrap();
        let root = doc.root();
        assert_eq!(root.tag(), "a");
        assert_eq!(root.inner_text(), "text content");
        assert_eq!(attrs(&doc), [("b", "1"), ("c", "2")]);
        assert!(root.parent().is_none());
        assert_eq!(root.children().count(), 0);
    }

    #[test]
    fn zero_attributes() {
        let doc = parse(b"<a>text</a>").unwrap();
        assert_eq!(doc.root().tag(), "a");
        assert!(doc.root().attributes().is_empty());
        assert_eq!(doc.root().inner_text(), "text");
    }

    #[test]
    fn empty_content() {
        let doc = parse(b"<a></a>").unwrap();
        assert_eq!(doc.root().inner_text(), "");
    }

    #[test]
    fn whitespace_insensitive() {
        let docs: Vec<_> = [
            "<a b=\"1\" c=\"2\">x</a>",
            "<a  b = \"1\"  c=\"2\" >x</a>",
            "<a\nb=\"1\"\nc=\"2\">x</a>",
        ]
        .iter()
        .map(|xml| parse(xml.as_bytes()).unwrap())
        .collect();
        assert_eq!(docs[0], docs[1]);
        assert_eq!(docs[1], docs[2]);
        assert_eq!(docs[0].root().inner_text(), "x");
    }

    #[test]
    fn leading_whitespace_and_trailing_content() {
        let doc = parse(b"\n  <a>x</a>\n<!-- ignored -->").unwrap();
        assert_eq!(doc.root().tag(), "a");
    }

    #[test]
    fn inner_text_is_exact_by_default() {
        let doc = parse(b"<a>\n  padded  \n</a>").unwrap();
        assert_eq!(doc.root().inner_text(), "\n  padded  \n");

        let doc = Parser::new(b"<a>\n  padded  \n</a>")
            .trim_whitespace(true)
            .parse()
            .unwrap();
        assert_eq!(doc.root().inner_text(), "padded");
    }

    #[test]
    fn nested_children() {
        let xml = br#"<list kind="todo">Items: <item id="1">milk</item> and <item id="2">eggs<note>free range</note></item>.</list>"#;
        let doc = parse(xml).unwrap();
        let root = doc.root();
        assert_eq!(root.inner_text(), "Items:  and .");
        assert_eq!(doc.len(), 4);

        let items: Vec<_> = root.children().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].attribute("id"), Some("1"));
        assert_eq!(items[0].inner_text(), "milk");
        assert_eq!(items[1].inner_text(), "eggs");
        for item in &items {
            assert_eq!(item.parent().map(|p| p.id()), Some(root.id()));
        }

        let note = items[1].children().next().unwrap();
        assert_eq!(note.tag(), "note");
        assert_eq!(note.inner_text(), "free range");
        assert_eq!(note.depth(), 2);
    }

    #[test]
    fn depth_limit() {
        let xml = b"<a><b><c>x</c></b></a>";
        assert!(Parser::new(xml).max_depth(2).parse().is_ok());

        let err = Parser::new(xml).max_depth(1).parse().unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::NestingTooDeep);
        assert_eq!(err.offset(), 6);
    }

    #[test]
    fn single_level_mode() {
        let err = Parser::new(b"<a>x<b>y</b></a>").max_depth(0).parse().unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingClosingSlash);
        assert_eq!(err.offset(), 4);

        assert!(Parser::new(b"<a>x</a>").max_depth(0).parse().is_ok());
    }

    #[test]
    fn tag_mismatch() {
        let err = parse(br#"<a b="1">x</c>"#).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::TagMismatch);
        assert_eq!(err.offset(), 12);

        assert_eq!(kind("<a><b>x</a></b>"), ParseErrorKind::TagMismatch);
        // byte-for-byte comparison
        assert_eq!(kind("<a>x</A>"), ParseErrorKind::TagMismatch);
        assert_eq!(kind("<a>x</a >"), ParseErrorKind::TagMismatch);
    }

    #[test]
    fn leading_whitespace_in_name() {
        let err = parse(b"< a>x</a>").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidElementNameStart);
        assert_eq!(err.offset(), 1);

        assert_eq!(kind("<a>x</ a>"), ParseErrorKind::InvalidElementNameStart);
        assert_eq!(kind("<>x</>"), ParseErrorKind::InvalidElementNameStart);
    }

    #[test]
    fn missing_attribute_value() {
        let err = parse(b"<a b=>x</a>").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingAttributeValue);
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn missing_attribute_name() {
        assert_eq!(kind(r#"<a ="1">x</a>"#), ParseErrorKind::MissingAttributeName);
    }

    #[test]
    fn invalid_element_name() {
        assert_eq!(kind(r#"<a="1">x</a>"#), ParseErrorKind::InvalidElementName);
    }

    #[test]
    fn missing_closing_tag() {
        let err = parse(br#"<a b="1">x<"#).unwrap_err();
        assert!(matches!(
            err.kind(),
            ParseErrorKind::UnterminatedElement | ParseErrorKind::MissingCloseAngle
        ));

        assert_eq!(kind("<a>x"), ParseErrorKind::UnterminatedElement);
        assert_eq!(kind("<a>x</a"), ParseErrorKind::MissingCloseAngle);
        assert_eq!(kind("<a b=\"1\""), ParseErrorKind::MissingCloseAngle);
    }

    #[test]
    fn missing_open_angle() {
        let err = parse(b"a>x</a>").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MissingOpenAngle);
        assert_eq!(err.offset(), 0);
        assert_eq!(kind(""), ParseErrorKind::MissingOpenAngle);
    }

    #[test]
    fn invalid_utf8_text() {
        let err = parse(b"<a>ok\xfe</a>").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidUtf8);
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn retry_after_failure() {
        assert!(parse(b"<a b=>x</a>").is_err());
        assert!(parse(br#"<a b="1">x</a>"#).is_ok());
    }

    #[test]
    fn angle_bracket_in_value_ends_the_tag() {
        let err = parse(br#"<a e="x>1">y</a>"#).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn round_trip() {
        let xml = r#"<config version="2" mode="fast">top<entry key="k">v</entry><empty></empty></config>"#;
        let doc = parse(xml.as_bytes()).unwrap();
        let written = doc.to_string();
        assert_eq!(written, xml);
        assert_eq!(parse(written.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn round_trip_normalizes_layout() {
        let doc = parse(b"<a  x = \"1\"\n>t<b\ty=\"2\">u</b></a>").unwrap();
        let written = doc.to_string();
        assert_eq!(written, r#"<a x="1">t<b y="2">u</b></a>"#);
        assert_eq!(parse(written.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn deterministic() {
        let xml = br#"<a one="1" two="2">text<b>c</b></a>"#;
        let first = parse(xml).unwrap();
        for _ in 0..3 {
            assert_eq!(parse(xml).unwrap(), first);
        }
    }
}
