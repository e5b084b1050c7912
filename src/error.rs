//! Error types for the huffrle library

use thiserror::Error;

/// Main error type for huffrle operations
#[derive(Debug, Error)]
pub enum HzError {
    /// A zero-sized or otherwise unusable argument was passed
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The output buffer cannot hold the result
    #[error("Output buffer too small: need at least {needed} bytes, have {available}")]
    OutputTooSmall { needed: usize, available: usize },

    /// The input ended before a structural field was complete
    #[error("Truncated input: {0}")]
    TruncatedInput(&'static str),

    /// Block mode byte outside the known set
    #[error("Invalid block mode: {0}")]
    InvalidMode(u8),

    /// CRC checksum mismatch
    #[error("CRC32C mismatch: expected {expected:#010X}, got {actual:#010X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// The serialized Huffman tree requires more nodes than the arena holds
    #[error("Huffman tree exceeds {0} nodes")]
    TreeOverflow(usize),

    /// A decoded symbol falls outside the 261-entry alphabet
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(u16),

    /// Decoded data would exceed the declared decoded length
    #[error("Output overflow: {0}")]
    OutputOverflow(&'static str),

    /// A size field is inconsistent with the surrounding structure
    #[error("Size mismatch: {0}")]
    SizeMismatch(&'static str),
}

/// Result type alias for huffrle operations
pub type Result<T> = std::result::Result<T, HzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_error_display() {
        let err = HzError::ChecksumMismatch {
            expected: 0x1234,
            actual: 0x5678,
        };
        assert!(err.to_string().contains("0x00001234"));
        assert!(err.to_string().contains("0x00005678"));
    }

    #[test]
    fn test_invalid_mode_display() {
        let err = HzError::InvalidMode(7);
        assert_eq!(err.to_string(), "Invalid block mode: 7");
    }
}
