use thiserror::Error;

/// Errors produced while encoding or decoding compressed fingerprints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("compressed fingerprint is shorter than the 4-byte header")]
    TruncatedHeader,
    #[error("fingerprint has {0} items; at most 16777215 fit the 24-bit length field")]
    TooManyItems(usize),
    #[error("declared item count {0} exceeds the payload capacity")]
    TruncatedNormalStream(usize),
    #[error("exception bit stream ended before all escaped symbols were read")]
    TruncatedExceptionStream,
    #[error("delta symbol overruns the 32-bit word")]
    SymbolOutOfRange,
    #[error("invalid base64 transport encoding: {0}")]
    Transport(#[from] base64::DecodeError),
}
