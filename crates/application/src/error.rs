use std::fmt::{Display, Formatter};

use photo_utm_domain::DomainError;

#[derive(Debug)]
pub enum ApplicationError {
    Domain(DomainError),
    InvalidInput(String),
    Io(String),
    Metadata(String),
    Sink(String),
}

impl ApplicationError {
    /// Errors that come from the filesystem or an output file rather than from the input values.
    pub fn is_read_write(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Metadata(_) | Self::Sink(_))
    }
}

impl Display for ApplicationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain(error) => write!(f, "{error}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Metadata(msg) => write!(f, "metadata error: {msg}"),
            Self::Sink(msg) => write!(f, "output error: {msg}"),
        }
    }
}

impl std::error::Error for ApplicationError {}

impl From<DomainError> for ApplicationError {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}
