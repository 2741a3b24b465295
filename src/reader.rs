//! FASTQ input.
//!
//! Only the sequence line of each record reaches the counting core; headers
//! and quality lines are parsed by [`bio::io::fastq`] and dropped here.

use std::{
    fmt,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use bio::io::fastq;
use bytes::Bytes;

use crate::error::TopKmerError;

/// Where reads come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A FASTQ file.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl Input {
    /// `-` means stdin; anything else is a file path.
    ///
    /// ```rust
    /// use std::path::Path;
    /// use topkmer::reader::Input;
    ///
    /// assert_eq!(Input::from_path(Path::new("-")), Input::Stdin);
    /// assert!(matches!(Input::from_path(Path::new("reads.fq")), Input::File(_)));
    /// ```
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Check if a path has a gzip extension (.gz).
#[cfg(feature = "gzip")]
fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn open(input: &Input) -> Result<Box<dyn Read>, TopKmerError> {
    match input {
        Input::Stdin => Ok(Box::new(io::stdin())),
        Input::File(path) => {
            let file = File::open(path).map_err(|source| TopKmerError::SequenceRead {
                source,
                path: path.clone(),
            })?;

            #[cfg(feature = "gzip")]
            {
                if is_gzip_path(path) {
                    return Ok(Box::new(flate2::read::GzDecoder::new(file)));
                }
            }

            Ok(Box::new(file))
        }
    }
}

/// Lazily yields the sequence of every FASTQ record, in file order.
///
/// # Errors
///
/// Fails up front if a file cannot be opened. Malformed records surface as
/// [`TopKmerError::SequenceParse`] items.
pub fn read_sequences(
    input: &Input,
) -> Result<impl Iterator<Item = Result<Bytes, TopKmerError>>, TopKmerError> {
    let records = fastq::Reader::new(open(input)?).records();
    Ok(records.map(|record| {
        record
            .map(|record| Bytes::copy_from_slice(record.seq()))
            .map_err(|e| TopKmerError::SequenceParse {
                details: e.to_string(),
            })
    }))
}

/// Reads the sequence of every FASTQ record into memory.
pub fn read_all_sequences(input: &Input) -> Result<Vec<Bytes>, TopKmerError> {
    read_sequences(input)?.collect()
}
