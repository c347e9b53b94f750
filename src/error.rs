use crate::riff::FourCC;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StegError>;

/// Container-level failures. All of them are fatal for the loaded file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("AVI file does not contain a main header (hdrl/avih)")]
    MissingMainHeader,

    #[error("AVI file does not declare a video stream header")]
    MissingVideoHeader,

    #[error("AVI file does not declare an audio stream header")]
    MissingAudioHeader,

    #[error("malformed chunk '{id}' at offset {offset}: {reason}")]
    MalformedChunk {
        id: FourCC,
        offset: usize,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn malformed(id: FourCC, offset: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedChunk {
            id,
            offset,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StegError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("not enough space for message: need {needed} bytes, {available} available")]
    InsufficientSpace { needed: usize, available: usize },

    #[error("no hidden message found in the selected streams")]
    MessageNotFound,

    #[error("character {ch:?} at position {position} does not fit in a single byte")]
    UnsupportedCharacter { ch: char, position: usize },
}
