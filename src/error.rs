//! Contains the Error and Result type used by the decoder.
use std::fmt::Display;

/// An error that occurred while decoding NBT.
///
/// Every layer of the decoder wraps the error it received with a short
/// description of what it was doing, so the `Display` output reads from the
/// outermost tag down to the primitive read that failed, eg
/// `compound: reading a child tag: Reading int16: Reading 2 bytes for integer:
/// unexpected end of input`.
#[derive(Debug, Clone)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
    source: Option<Box<Error>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to new
    /// variants.
    Other,

    /// The input ran out part way through a tag.
    UnexpectedEof,

    /// A tag type code outside of the known range was found.
    InvalidTag(u8),

    /// A declared length was negative, over the configured limit, or not
    /// allowed for the element type.
    InvalidSize,

    /// Lists and compounds were nested deeper than the configured limit.
    DepthLimit,

    /// A byte order was given that is neither big nor little endian.
    UnsupportedByteOrder,

    /// The decoder was asked to do something it cannot, such as read an
    /// integer of an unsupported width.
    Config,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error. For a wrapped error this is the kind of the
    /// innermost cause.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The message of this layer only, without any of the wrapped causes.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Iterate over this error and every error it wraps, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |e| e.source.as_deref())
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }

    /// Wrap this error with a message describing what was being done when it
    /// occurred.
    pub fn context(self, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: self.kind.clone(),
            source: Some(Box::new(self)),
        }
    }

    pub(crate) fn bespoke(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Other)
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::new("unexpected end of input", ErrorKind::UnexpectedEof)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::new(format!("invalid tag: {}", tag), ErrorKind::InvalidTag(tag))
    }

    pub(crate) fn invalid_size(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::InvalidSize)
    }

    pub(crate) fn depth_limit(limit: usize) -> Self {
        Self::new(
            format!("nesting depth exceeds limit of {}", limit),
            ErrorKind::DepthLimit,
        )
    }

    pub(crate) fn unsupported_byte_order(order: &str) -> Self {
        Self::new(
            format!("byte order not recognized: {:?}", order),
            ErrorKind::UnsupportedByteOrder,
        )
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Config)
    }

    fn new(msg: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            msg: msg.into(),
            kind,
            source: None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)?;
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::unexpected_eof(),
            // Probably want to include the IO error in future.
            _ => Error::bespoke(format!("io error: {}", e)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::bespoke(format!("json error: {}", e))
    }
}

/// Attach context to the error of a `Result`.
pub(crate) trait Context<T> {
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| e.context(msg))
    }
}
