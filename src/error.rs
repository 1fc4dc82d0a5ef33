//! Error types for the DTED library.

use thiserror::Error;

/// Errors that can occur when working with DTED data.
#[derive(Error, Debug)]
pub enum DtedError {
    /// IO error when reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is shorter than its header layout implies.
    #[error("Truncated DTED file: expected at least {expected} bytes, found {actual}")]
    TruncatedFile { expected: usize, actual: usize },

    /// A required header field is absent, malformed, or fails cross-validation.
    ///
    /// This error is fatal for tile construction: a [`Tile`](crate::Tile) is
    /// never left partially valid.
    #[error("Malformed header field '{field}': {reason}")]
    MalformedHeader {
        field: &'static str,
        reason: String,
    },

    /// A data record has a bad sentinel or an unexpected latitude count.
    ///
    /// Fatal for that record only; other records remain readable.
    #[error("Invalid data record at longitude line {longitude_index}: {reason}")]
    InvalidRecord {
        longitude_index: usize,
        reason: String,
    },

    /// A data record failed checksum verification.
    #[error(
        "Checksum mismatch at longitude line {longitude_index}: \
         expected {expected}, computed {computed}"
    )]
    Checksum {
        longitude_index: usize,
        expected: u32,
        computed: u32,
    },

    /// The requested coordinate lies outside the tile extent.
    ///
    /// Fatal for that lookup only; the tile stays usable.
    #[error("Coordinate out of bounds: lat={lat}, lon={lon}")]
    OutOfBounds { lat: f64, lon: f64 },
}

/// Result type alias using [`DtedError`].
pub type Result<T> = std::result::Result<T, DtedError>;
