//! Two-bit nucleotide encoding.
//!
//! K-mers of up to [`MAX_ENCODED_LEN`] bases are packed into a `u64`, two bits
//! per base, first base in the most significant position:
//!
//! | base | bits |
//! |------|------|
//! | A    | `00` |
//! | C    | `01` |
//! | G    | `10` |
//! | T    | `11` |
//!
//! The packed value does not record its own length, so decoding always needs
//! the [`KmerLength`] the value was packed with.
//!
//! # Example
//!
//! ```rust
//! use topkmer::kmer::{decode, encode, KmerLength};
//!
//! let k = KmerLength::new(4)?;
//! let code = encode(b"ACGT");
//! assert_eq!(code, 0b00_01_10_11);
//! assert_eq!(decode(code, k), "ACGT");
//! # Ok::<(), topkmer::error::ConfigError>(())
//! ```

use std::fmt;

use bytes::Bytes;

use crate::error::{ConfigError, InvalidBaseError};

/// The longest k-mer that fits in a `u64` at two bits per base.
pub const MAX_ENCODED_LEN: usize = 32;

const BASE_MASK: u64 = 0b11;

/// A validated k-mer length, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Validates a k-mer length.
    ///
    /// Lengths above [`MAX_ENCODED_LEN`] are valid; they are counted as raw
    /// byte strings instead of packed integers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroKmerLength`] if `k` is zero.
    pub const fn new(k: usize) -> Result<Self, ConfigError> {
        if k == 0 {
            Err(ConfigError::ZeroKmerLength)
        } else {
            Ok(Self(k))
        }
    }

    /// Returns the length as a `usize`.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns `true` if k-mers of this length fit in a packed `u64`.
    pub const fn is_encodable(self) -> bool {
        self.0 <= MAX_ENCODED_LEN
    }
}

impl fmt::Display for KmerLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    const fn from_code(code: u64) -> Self {
        match code & BASE_MASK {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }

    const fn code(self) -> u64 {
        match self {
            Self::A => 0,
            Self::C => 1,
            Self::G => 2,
            Self::T => 3,
        }
    }

    const fn as_byte(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

/// Two-bit code of a byte. Anything outside `{A, C, G, T}` contributes `00`.
#[inline]
const fn lenient_code(byte: u8) -> u64 {
    match Base::from_byte(byte) {
        Some(base) => base.code(),
        None => 0,
    }
}

/// Packs a k-mer into a `u64`.
///
/// Each base shifts the accumulator left by two bits and adds its code. A byte
/// outside `{A, C, G, T}` still shifts but adds nothing, so it reads back as
/// `A`: `ACNT` and `ACAT` pack to the same value. Use [`try_encode`] to reject
/// such bytes instead.
///
/// Inputs longer than [`MAX_ENCODED_LEN`] lose their leading bases. Callers
/// check the length once up front with [`KmerLength::is_encodable`].
pub fn encode(kmer: &[u8]) -> u64 {
    kmer.iter()
        .fold(0, |code, &byte| (code << 2) | lenient_code(byte))
}

/// Packs a k-mer into a `u64`, rejecting bytes outside `{A, C, G, T}`.
///
/// # Errors
///
/// Returns [`InvalidBaseError`] for the first invalid byte.
pub fn try_encode(kmer: &[u8]) -> Result<u64, InvalidBaseError> {
    kmer.iter()
        .enumerate()
        .try_fold(0, |code, (position, &byte)| {
            Base::from_byte(byte)
                .map(|base| (code << 2) | base.code())
                .ok_or(InvalidBaseError {
                    base: byte,
                    position,
                })
        })
}

/// Unpacks a `u64` into the `k` bases it was packed from.
///
/// # Example
///
/// ```rust
/// use topkmer::kmer::{decode, KmerLength};
///
/// let k = KmerLength::new(3)?;
/// assert_eq!(decode(0b10_00_11, k), "GAT");
/// # Ok::<(), topkmer::error::ConfigError>(())
/// ```
pub fn decode(code: u64, k: KmerLength) -> String {
    unpack(code, k).map(|base| char::from(base.as_byte())).collect()
}

/// Like [`decode`], but returns the bases as bytes.
pub fn decode_to_bytes(code: u64, k: KmerLength) -> Bytes {
    unpack(code, k).map(Base::as_byte).collect()
}

/// Yields the bases of a packed k-mer, first base first.
fn unpack(code: u64, k: KmerLength) -> impl Iterator<Item = Base> {
    let mut bases = vec![Base::A; k.get()];
    let mut code = code;
    for slot in bases.iter_mut().rev() {
        *slot = Base::from_code(code);
        code >>= 2;
    }
    bases.into_iter()
}

/// Finds the first byte of `seq` outside `{A, C, G, T}`.
pub fn find_invalid(seq: &[u8]) -> Option<InvalidBaseError> {
    seq.iter()
        .position(|&byte| Base::from_byte(byte).is_none())
        .map(|position| InvalidBaseError {
            base: seq[position],
            position,
        })
}

/// Packed codes of every k-mer window of a sequence, in order.
///
/// Each step shifts one base into the previous code and masks it to `2k` bits,
/// so a read of length `L` costs `L` steps rather than `(L - k + 1) * k`. The
/// codes are identical to calling [`encode`] on each window.
///
/// # Example
///
/// ```rust
/// use topkmer::kmer::{encode, KmerLength, RollingEncoder};
///
/// let k = KmerLength::new(2)?;
/// let codes: Vec<u64> = RollingEncoder::new(b"ACGT", k).collect();
/// assert_eq!(codes, vec![encode(b"AC"), encode(b"CG"), encode(b"GT")]);
/// # Ok::<(), topkmer::error::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RollingEncoder<'a> {
    bases: std::slice::Iter<'a, u8>,
    code: u64,
    mask: u64,
    k: usize,
    filled: usize,
}

impl<'a> RollingEncoder<'a> {
    /// Creates an encoder over the windows of `seq`.
    ///
    /// `k` must be encodable; longer lengths keep only the last
    /// [`MAX_ENCODED_LEN`] bases of each window.
    pub fn new(seq: &'a [u8], k: KmerLength) -> Self {
        let width = 2 * k.get().min(MAX_ENCODED_LEN);
        Self {
            bases: seq.iter(),
            code: 0,
            mask: u64::MAX >> (64 - width),
            k: k.get(),
            filled: 0,
        }
    }
}

impl Iterator for RollingEncoder<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let &byte = self.bases.next()?;
            self.code = ((self.code << 2) | lenient_code(byte)) & self.mask;
            if self.filled + 1 >= self.k {
                self.filled = self.k;
                return Some(self.code);
            }
            self.filled += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.filled >= self.k {
            self.bases.len()
        } else {
            (self.bases.len() + self.filled + 1).saturating_sub(self.k)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RollingEncoder<'_> {}
