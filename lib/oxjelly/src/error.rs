use std::io;

/// Error returned during Jelly parsing.
#[derive(Debug, thiserror::Error)]
pub enum JellyParseError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Syntax(#[from] JellySyntaxError),
}

impl From<JellyParseError> for io::Error {
    #[inline]
    fn from(error: JellyParseError) -> Self {
        match error {
            JellyParseError::Io(error) => error,
            JellyParseError::Syntax(error) => error.into(),
        }
    }
}

/// An invalid Jelly stream.
#[derive(Debug, thiserror::Error)]
pub enum JellySyntaxError {
    #[error(transparent)]
    Protobuf(#[from] protobuf::Error),
    #[error(transparent)]
    IriParseError(#[from] oxrdf::IriParseError),
    #[error(transparent)]
    BlankNodeIdParseError(#[from] oxrdf::BlankNodeIdParseError),
    #[error(transparent)]
    LanguageTagParseError(#[from] oxrdf::LanguageTagParseError),
    #[error("The stream options must be the first row of the stream")]
    MissingOptions,
    #[error("Unsupported stream: {0}")]
    UnsupportedStream(&'static str),
    #[error("Unsupported term: {0}")]
    UnsupportedTerm(&'static str),
    #[error("The {0} lookup table size {1} is too large")]
    TableTooLarge(&'static str, u32),
    #[error("Invalid frame length")]
    InvalidFrameLength,
    #[error("Prefix ID not found: {0}")]
    PrefixIdNotFound(u32),
    #[error("Name ID not found: {0}")]
    NameIdNotFound(u32),
    #[error("Datatype ID not found: {0}")]
    DatatypeIdNotFound(u32),
    #[error("ID out of bounds: provided = {0}, maximum = {1}")]
    IdOutOfBounds(u32, u32),
    #[error("No previous subject")]
    NoPreviousSubject,
    #[error("No previous predicate")]
    NoPreviousPredicate,
    #[error("No previous object")]
    NoPreviousObject,
    #[error("No previous graph name")]
    NoPreviousGraphName,
}

impl From<JellySyntaxError> for io::Error {
    #[inline]
    fn from(error: JellySyntaxError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}
