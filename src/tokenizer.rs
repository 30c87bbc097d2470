//! Splits the text of an opening tag into its element name and attributes.
//!
//! The automaton is driven by the delimiter that closes each token (whitespace, `=` or `"`)
//! rather than by look-ahead, so the whole tag is tokenized in one linear pass.
//!
//! ```text
//! InitialWhitespaceCheck -> TagName -> CompleteToken -> ConsumeWhitespace
//! ConsumeWhitespace -> AttributeName | AttributeValue | CompleteToken
//! AttributeName -> ConsumeWhitespace | CompleteToken
//! AttributeValue -> CompleteToken
//! CompleteToken -> ConsumeWhitespace
//! ```
//!
//! Running off the end of the tag text is the `EndOfString` transition, handled in
//! `Tokenizer::finish`. Any grammar violation returns a [`ParseError`] immediately.

use crate::{
    document::{Attribute, Text},
    error::{ParseError, ParseErrorKind},
    scanner::is_whitespace,
};
use std::ops::Range;

/// Element name and attributes of an opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningTag {
    name: Text,
    attributes: Vec<Attribute>,
}

impl OpeningTag {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in the order they appear in the tag.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn into_parts(self) -> (Text, Vec<Attribute>) {
        (self.name, self.attributes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Disallows whitespace before the element name.
    InitialWhitespaceCheck,
    /// Accumulating the element name.
    TagName,
    /// Accumulating an attribute name.
    AttributeName,
    /// Accumulating an attribute value, after its opening quote.
    AttributeValue,
    /// Skipping whitespace between tokens.
    ConsumeWhitespace,
    /// The byte under the cursor closed a token; dispatch on it.
    CompleteToken,
}

/// Tokenizes the text between `<` and `>` of an opening tag.
///
/// Only whitespace, `=` and `"` are significant; names are not checked against the XML name
/// grammar and values are returned raw. Error offsets are relative to `tag`.
///
/// ```
/// let tag = firexml::tokenize(br#"item id="7" kind = "book""#).unwrap();
/// assert_eq!(tag.name(), "item");
/// assert_eq!(tag.attributes()[1].name(), "kind");
/// assert_eq!(tag.attributes()[1].value(), "book");
/// ```
pub fn tokenize(tag: &[u8]) -> Result<OpeningTag, ParseError> {
    Tokenizer::new(tag).run()
}

struct Tokenizer<'t> {
    source: &'t [u8],
    pos: usize,

    /// The accumulator. Tokens are always contiguous, so a range is enough.
    token: Range<usize>,
    tag_name: Option<Range<usize>>,
    attribute_name: Option<Range<usize>>,
    attributes: Vec<Attribute>,
}

impl<'t> Tokenizer<'t> {
    fn new(source: &'t [u8]) -> Self {
        Self {
            source,
            pos: 0,
            token: 0..0,
            tag_name: None,
            attribute_name: None,
            attributes: Vec::new(),
        }
    }

    fn run(mut self) -> Result<OpeningTag, ParseError> {
        let mut state = State::InitialWhitespaceCheck;
        while let Some(&ch) = self.source.get(self.pos) {
            let next = self.step(state, ch)?;
            log::trace!(
                target: "firexml::tokenizer",
                "{:?} -> {:?} at {} ({:?})",
                state,
                next,
                self.pos,
                ch as char
            );
            state = next;
        }
        log::trace!(target: "firexml::tokenizer", "{:?} -> EndOfString", state);
        self.finish(state)
    }

    fn step(&mut self, state: State, ch: u8) -> Result<State, ParseError> {
        let next = match state {
            State::InitialWhitespaceCheck => {
                if is_whitespace(ch) {
                    return Err(self.malformed(ParseErrorKind::InvalidElementNameStart));
                }
                self.begin_token();
                State::TagName
            }

            State::TagName => match ch {
                b'=' | b'"' => return Err(self.malformed(ParseErrorKind::InvalidElementName)),
                _ if is_whitespace(ch) => State::CompleteToken,
                _ => {
                    self.accumulate();
                    State::TagName
                }
            },

            State::ConsumeWhitespace => match ch {
                _ if is_whitespace(ch) => {
                    self.pos += 1;
                    State::ConsumeWhitespace
                }
                // Completes a name suspended by whitespace, as in `attr = "value"`.
                b'=' if !self.token.is_empty() => State::CompleteToken,
                b'=' => return Err(self.malformed(ParseErrorKind::MissingAttributeName)),
                // A suspended name only continues through `=`.
                _ if !self.token.is_empty() => {
                    return Err(self.malformed(ParseErrorKind::MissingAttributeValue))
                }
                b'"' => {
                    self.pos += 1;
                    self.begin_token();
                    State::AttributeValue
                }
                // Got `name=` but no opening quote.
                _ if self.attribute_name.is_some() => {
                    return Err(self.malformed(ParseErrorKind::MissingAttributeValue))
                }
                _ => {
                    self.begin_token();
                    State::AttributeName
                }
            },

            State::AttributeName => match ch {
                b'=' => State::CompleteToken,
                _ if is_whitespace(ch) => State::ConsumeWhitespace,
                _ => {
                    self.accumulate();
                    State::AttributeName
                }
            },

            State::AttributeValue => match ch {
                b'"' if self.attribute_name.is_none() => {
                    return Err(self.malformed(ParseErrorKind::MissingAttributeName))
                }
                b'"' => State::CompleteToken,
                _ => {
                    self.accumulate();
                    State::AttributeValue
                }
            },

            State::CompleteToken => {
                self.complete_token(ch)?;
                State::ConsumeWhitespace
            }
        };
        Ok(next)
    }

    /// Hands the accumulated token to whatever its closing delimiter says it is,
    /// then steps over the delimiter.
    fn complete_token(&mut self, delimiter: u8) -> Result<(), ParseError> {
        let token = self.token.clone();
        match delimiter {
            b'=' => self.attribute_name = Some(token),
            b'"' => match self.attribute_name.take() {
                Some(name) => {
                    let name = self.text(name)?;
                    let value = self.text(token)?;
                    self.attributes.push(Attribute::new(name, value));
                }
                None => return Err(self.malformed(ParseErrorKind::MissingAttributeName)),
            },
            _ => self.tag_name = Some(token),
        }
        self.pos += 1;
        self.token = self.pos..self.pos;
        Ok(())
    }

    fn finish(self, state: State) -> Result<OpeningTag, ParseError> {
        match state {
            // empty tag text, as in `<>`
            State::InitialWhitespaceCheck => {
                return Err(self.malformed(ParseErrorKind::InvalidElementNameStart))
            }
            State::AttributeValue => {
                return Err(self.malformed(ParseErrorKind::UnexpectedEndOfInput))
            }
            State::AttributeName => {
                return Err(self.malformed(ParseErrorKind::MissingAttributeValue))
            }
            State::ConsumeWhitespace | State::CompleteToken
                if self.attribute_name.is_some() || !self.token.is_empty() =>
            {
                return Err(self.malformed(ParseErrorKind::MissingAttributeValue))
            }
            _ => {}
        }

        // With no attributes the whole accumulated token is the name.
        let name = match self.tag_name.clone() {
            Some(name) => name,
            None => self.token.clone(),
        };
        Ok(OpeningTag {
            name: self.text(name)?,
            attributes: self.attributes,
        })
    }

    fn begin_token(&mut self) {
        self.token = self.pos..self.pos;
    }

    fn accumulate(&mut self) {
        self.pos += 1;
        self.token.end = self.pos;
    }

    fn text(&self, range: Range<usize>) -> Result<Text, ParseError> {
        let offset = range.start;
        Text::from_utf8(&self.source[range], offset)
    }

    fn malformed(&self, kind: ParseErrorKind) -> ParseError {
        log::debug!(
            target: "firexml::tokenizer",
            "malformed opening tag <{}>: {} at byte {}",
            String::from_utf8_lossy(self.source),
            kind,
            self.pos
        );
        ParseError::new(kind, self.pos)
    }
}
