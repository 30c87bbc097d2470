use crate::{document::Document, error::LoadError, error::ParseError, parser::Parser};
use std::{
    fs,
    io::Read,
    path::Path,
    str::FromStr,
};

const BOM: &[u8] = b"\xEF\xBB\xBF";

impl Document {
    /// Reads and parses the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::load_with(path, |parser| parser)
    }

    /// Reads and parses the file at `path`, letting `configure` adjust the [`Parser`] settings.
    ///
    /// ```no_run
    /// let doc = firexml::Document::load_with("test.xml", |p| p.trim_whitespace(true)).unwrap();
    /// ```
    pub fn load_with<P, F>(path: P, configure: F) -> Result<Self, LoadError>
    where
        P: AsRef<Path>,
        F: for<'b> FnOnce(Parser<'b>) -> Parser<'b>,
    {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes_with(&bytes, configure)
    }

    /// Reads `reader` to the end and parses its contents.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        log::debug!("read {} bytes from reader", bytes.len());
        Self::from_bytes(&bytes)
    }

    /// Parses a buffer with default settings, stripping a UTF-8 BOM if it's present.
    ///
    /// Unlike [`Parser::parse`], an empty buffer is reported as [`LoadError::EmptyInput`].
    /// Error offsets still count from the start of `bytes`, BOM included.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::from_bytes_with(bytes, |parser| parser)
    }

    /// Same as [`Document::from_bytes`], letting `configure` adjust the [`Parser`] settings.
    pub fn from_bytes_with<F>(bytes: &[u8], configure: F) -> Result<Self, LoadError>
    where
        F: for<'b> FnOnce(Parser<'b>) -> Parser<'b>,
    {
        let body = bytes.strip_prefix(BOM).unwrap_or(bytes);
        if body.is_empty() {
            return Err(LoadError::EmptyInput);
        }
        let skipped = bytes.len() - body.len();
        Ok(configure(Parser::new(body))
            .parse()
            .map_err(|e| e.rebase(skipped))?)
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim_start_matches('\u{feff}');
        let skipped = s.len() - body.len();
        Parser::new(body.as_bytes())
            .parse()
            .map_err(|e| e.rebase(skipped))
    }
}
