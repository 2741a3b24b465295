//! Error types for topkmer.
//!
//! Configuration problems are fatal and surface as [`ConfigError`]. Everything
//! else the library can fail with is collected in [`TopKmerError`].

use std::path::PathBuf;
use thiserror::Error;

/// Invalid run configuration, detected before or at the start of a scan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// K-mer length of zero.
    #[error("invalid k-mer length 0: must be at least 1")]
    ZeroKmerLength,

    /// Top-N count of zero.
    #[error("invalid number of top k-mers 0: must be at least 1")]
    ZeroTopCount,

    /// The k-mer length exceeds the length of a read it must be checked against.
    #[error("k-mer length {k} is larger than the length {read_len} of read {read}")]
    KmerLongerThanRead {
        /// Requested k-mer length.
        k: usize,
        /// Length of the offending read.
        read_len: usize,
        /// Zero-based index of the offending read.
        read: usize,
    },

    /// The packed representation was requested for a k-mer that does not fit in 64 bits.
    #[error("k-mer length {k} cannot be encoded: at most {max} bases fit in 64 bits")]
    TooLongToEncode { k: usize, max: usize },
}

/// Error for a byte outside `{A, C, G, T}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the k-mer or read.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

/// Errors that can occur in topkmer operations.
#[derive(Debug, Error)]
pub enum TopKmerError {
    /// Fatal configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A read contained a non-ACGT byte while strict base checking was on.
    #[error("invalid base '{}' at position {position} of read {read}", base_char(.base))]
    InvalidBase {
        base: u8,
        position: usize,
        read: usize,
    },

    /// Failed to open or read the sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    SequenceRead {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to parse a FASTQ record.
    #[error("failed to parse FASTQ record: {details}")]
    SequenceParse { details: String },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn base_char(base: &u8) -> char {
    char::from(*base)
}

impl TopKmerError {
    pub(crate) fn invalid_base(err: InvalidBaseError, read: usize) -> Self {
        Self::InvalidBase {
            base: err.base,
            position: err.position,
            read,
        }
    }
}

impl From<std::io::Error> for TopKmerError {
    fn from(source: std::io::Error) -> Self {
        Self::Write { source }
    }
}

impl From<serde_json::Error> for TopKmerError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}
