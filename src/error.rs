//! Error types for the Huffman codec.

use thiserror::Error;

/// Result type alias using [`HuffmanError`].
pub type Result<T> = std::result::Result<T, HuffmanError>;

/// Errors surfaced by encode and decode.
///
/// All three kinds are synchronous, local failures; nothing is retried.
/// Callers can tell "no usable input" from "malformed payload" from
/// "payload cut off mid-code".
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Empty text passed to encode, or decode called with no payload loaded.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Payload lacks the tree delimiter, the tree section does not parse,
    /// or the bitstream contains an impossible path.
    #[error("format error: {0}")]
    Format(String),

    /// Bitstream ended in the middle of a code.
    #[error("payload truncated after {consumed_bits} bits: bitstream ends mid-code")]
    TruncatedPayload { consumed_bits: usize },
}

impl HuffmanError {
    /// Create an invalid-input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        HuffmanError::InvalidInput(msg.into())
    }

    /// Create a format error.
    pub fn format(msg: impl Into<String>) -> Self {
        HuffmanError::Format(msg.into())
    }
}
