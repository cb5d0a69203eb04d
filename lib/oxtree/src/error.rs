use std::io;

/// Error returned when writing a TREE profile page.
#[derive(Debug, thiserror::Error)]
pub enum TreeSerializeError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    MalformedTerm(#[from] MalformedTermError),
}

impl From<TreeSerializeError> for io::Error {
    #[inline]
    fn from(error: TreeSerializeError) -> Self {
        match error {
            TreeSerializeError::Io(error) => error,
            TreeSerializeError::MalformedTerm(error) => error.into(),
        }
    }
}

/// A term that can't be written in a member quad, like a blank node or the default graph.
#[derive(Debug, thiserror::Error)]
#[error("{term} is not allowed in the {position} of a member quad")]
pub struct MalformedTermError {
    pub(crate) term: String,
    pub(crate) position: &'static str,
}

impl MalformedTermError {
    /// The offending term, in N-Quads syntax.
    #[inline]
    pub fn term(&self) -> &str {
        &self.term
    }
}

impl From<MalformedTermError> for io::Error {
    #[inline]
    fn from(error: MalformedTermError) -> Self {
        Self::new(io::ErrorKind::InvalidInput, error)
    }
}
