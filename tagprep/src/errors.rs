//! Definition of errors.

use std::path::PathBuf;

pub type Result<T, E = TagprepError> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum TagprepError {
    /// Error used when the argument is invalid.
    #[error("InvalidArgumentError: {arg}: {msg}")]
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,

        /// Error message.
        msg: String,
    },

    /// Error used when a segmented corpus line violates the expected format.
    #[error("MalformedCorpusError: {}:{line}: {msg}", .path.display())]
    MalformedCorpus {
        /// File the line was read from.
        path: PathBuf,

        /// 1-based line number.
        line: usize,

        /// Error message.
        msg: String,
    },

    /// Error used when a pretrained vector source cannot be used.
    #[error("InvalidVectorsError: {0}")]
    InvalidVectors(String),

    /// Error reported by the external tagger.
    #[error("TaggerError: {0}")]
    Tagger(String),

    #[error(transparent)]
    DecodeError(#[from] bincode::error::DecodeError),

    #[error(transparent)]
    EncodeError(#[from] bincode::error::EncodeError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

impl TagprepError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument {
            arg,
            msg: msg.into(),
        }
    }

    pub(crate) fn malformed_corpus<P, S>(path: P, line: usize, msg: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self::MalformedCorpus {
            path: path.into(),
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_vectors<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidVectors(msg.into())
    }
}
