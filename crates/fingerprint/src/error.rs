use dsp::DspError;
use thiserror::Error;

/// Errors produced while configuring or running the fingerprinter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("unknown algorithm id {0}")]
    UnknownAlgorithm(u8),
    #[error("unknown option \"{0}\"")]
    UnknownOption(String),
    #[error("option \"{name}\" value {value} is out of range {min}..={max}")]
    OptionOutOfRange {
        name: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("fingerprinter has not been started")]
    NotStarted,
    #[error(transparent)]
    Audio(#[from] DspError),
}
