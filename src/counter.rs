//! K-mer frequency aggregation.
//!
//! [`KmerCounter`] slides a window of length `k` over every read and counts
//! each window in a [`FrequencyTable`]. The representation is picked once per
//! run from `k`:
//!
//! - `k <= 32`: windows are packed into `u64` keys (see [`crate::kmer`]).
//! - `k > 32`: windows are kept as raw byte strings.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use topkmer::counter::KmerCounter;
//! use topkmer::kmer::KmerLength;
//!
//! let k = KmerLength::new(2)?;
//! let table = KmerCounter::new(k).count_reads([Bytes::from_static(b"ACGTACGT")])?;
//!
//! assert_eq!(table.total(), 7);
//! assert_eq!(table.get(b"AC"), Some(2));
//! assert_eq!(table.get(b"TA"), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{collections::HashMap, hash::BuildHasherDefault, time::Instant};

use bytes::Bytes;
use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHasher};
use tracing::{debug, info, info_span};

use crate::{
    error::{ConfigError, TopKmerError},
    kmer::{decode, find_invalid, try_encode, KmerLength, RollingEncoder, MAX_ENCODED_LEN},
};

/// A custom `DashMap` w/ `FxHasher`.
type DashFx<K> = DashMap<K, u64, BuildHasherDefault<FxHasher>>;

/// Which reads must be at least `k` bases long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthCheck {
    /// Only the first read is checked. Later shorter reads yield no k-mers.
    #[default]
    FirstRead,
    /// Every read is checked.
    EveryRead,
}

/// Occurrence counts of every distinct k-mer seen in a scan.
///
/// Built only through [`for_length`](Self::for_length),
/// [`packed`](Self::packed) and [`raw`](Self::raw), so a packed table never
/// holds k-mers longer than [`MAX_ENCODED_LEN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    k: KmerLength,
    counts: Counts,
}

/// Storage behind a [`FrequencyTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Counts {
    /// K-mers packed into `u64` keys, for `k <= 32`.
    Packed(FxHashMap<u64, u64>),
    /// K-mers kept as their bases.
    Raw(FxHashMap<Bytes, u64>),
}

impl FrequencyTable {
    /// Creates an empty table, packed if `k` is encodable and raw otherwise.
    pub fn for_length(k: KmerLength) -> Self {
        Self::packed(k).unwrap_or_else(|_| Self::raw(k))
    }

    /// Creates an empty packed table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooLongToEncode`] if `k` does not fit in a `u64`.
    pub fn packed(k: KmerLength) -> Result<Self, ConfigError> {
        if !k.is_encodable() {
            return Err(ConfigError::TooLongToEncode {
                k: k.get(),
                max: MAX_ENCODED_LEN,
            });
        }
        Ok(Self {
            k,
            counts: Counts::Packed(FxHashMap::default()),
        })
    }

    /// Creates an empty raw table. Valid for any `k`.
    pub fn raw(k: KmerLength) -> Self {
        Self {
            k,
            counts: Counts::Raw(FxHashMap::default()),
        }
    }

    /// The k-mer length this table counts.
    pub const fn kmer_len(&self) -> KmerLength {
        self.k
    }

    /// Returns `true` for the packed representation.
    pub const fn is_packed(&self) -> bool {
        matches!(self.counts, Counts::Packed(_))
    }

    /// Number of distinct k-mers.
    pub fn len(&self) -> usize {
        match &self.counts {
            Counts::Packed(counts) => counts.len(),
            Counts::Raw(counts) => counts.len(),
        }
    }

    /// Returns `true` if no k-mer has been counted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of k-mer windows counted.
    pub fn total(&self) -> u64 {
        match &self.counts {
            Counts::Packed(counts) => counts.values().sum(),
            Counts::Raw(counts) => counts.values().sum(),
        }
    }

    /// Looks up the count of a k-mer.
    ///
    /// Returns `None` for k-mers of the wrong length, k-mers never seen, and,
    /// on a packed table, k-mers containing bytes outside `{A, C, G, T}`.
    pub fn get(&self, kmer: &[u8]) -> Option<u64> {
        if kmer.len() != self.k.get() {
            return None;
        }
        match &self.counts {
            Counts::Packed(counts) => {
                let code = try_encode(kmer).ok()?;
                counts.get(&code).copied()
            }
            Counts::Raw(counts) => counts.get(kmer).copied(),
        }
    }

    /// Counts every window of `seq`. Sequences shorter than `k` add nothing.
    pub fn add_sequence(&mut self, seq: &[u8]) {
        let k = self.k;
        match &mut self.counts {
            Counts::Packed(counts) => {
                for code in RollingEncoder::new(seq, k) {
                    *counts.entry(code).or_insert(0) += 1;
                }
            }
            Counts::Raw(counts) => {
                for window in seq.windows(k.get()) {
                    // Only copy the window out of the read the first time we see it
                    if let Some(count) = counts.get_mut(window) {
                        *count += 1;
                    } else {
                        counts.insert(Bytes::copy_from_slice(window), 1);
                    }
                }
            }
        }
    }

    /// Converts the table into k-mer strings and their counts.
    pub fn into_counts(self) -> HashMap<String, u64> {
        let k = self.k;
        match self.counts {
            Counts::Packed(counts) => counts
                .into_iter()
                .map(|(code, count)| (decode(code, k), count))
                .collect(),
            Counts::Raw(counts) => counts
                .into_iter()
                .map(|(kmer, count)| (String::from_utf8_lossy(&kmer).into_owned(), count))
                .collect(),
        }
    }

    pub(crate) fn into_parts(self) -> (KmerLength, Counts) {
        (self.k, self.counts)
    }
}

/// Builds [`FrequencyTable`]s from reads.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use topkmer::counter::{KmerCounter, LengthCheck};
/// use topkmer::kmer::KmerLength;
///
/// let counter = KmerCounter::new(KmerLength::new(3)?)
///     .length_check(LengthCheck::EveryRead)
///     .strict_bases(true);
///
/// let reads = [Bytes::from_static(b"ACGT"), Bytes::from_static(b"AC")];
/// assert!(counter.count_reads(reads).is_err());
/// # Ok::<(), topkmer::error::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KmerCounter {
    k: KmerLength,
    length_check: LengthCheck,
    strict_bases: bool,
}

impl KmerCounter {
    /// Creates a counter checking only the first read's length, with lenient
    /// base handling.
    pub const fn new(k: KmerLength) -> Self {
        Self {
            k,
            length_check: LengthCheck::FirstRead,
            strict_bases: false,
        }
    }

    /// Sets which reads must be at least `k` bases long.
    #[must_use]
    pub const fn length_check(mut self, length_check: LengthCheck) -> Self {
        self.length_check = length_check;
        self
    }

    /// When `true`, a read containing a byte outside `{A, C, G, T}` fails the scan.
    ///
    /// When `false` (the default), such bytes alias to `A` in packed k-mers and
    /// are kept verbatim in raw k-mers.
    #[must_use]
    pub const fn strict_bases(mut self, strict_bases: bool) -> Self {
        self.strict_bases = strict_bases;
        self
    }

    /// The k-mer length this counter extracts.
    pub const fn kmer_len(&self) -> KmerLength {
        self.k
    }

    /// Counts the k-mers of every read, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KmerLongerThanRead`] if a checked read is shorter
    /// than `k`, and [`TopKmerError::InvalidBase`] in strict mode. No partial
    /// table is returned.
    pub fn count_reads<I>(&self, reads: I) -> Result<FrequencyTable, TopKmerError>
    where
        I: IntoIterator<Item = Bytes>,
    {
        self.try_count_reads(reads.into_iter().map(Ok))
    }

    /// Like [`count_reads`](Self::count_reads), for fallible read sources such
    /// as a FASTQ parser. The first read error ends the scan.
    pub fn try_count_reads<I>(&self, reads: I) -> Result<FrequencyTable, TopKmerError>
    where
        I: IntoIterator<Item = Result<Bytes, TopKmerError>>,
    {
        let _span = info_span!("count_kmers", k = self.k.get()).entered();
        let start = Instant::now();

        let mut table = FrequencyTable::for_length(self.k);
        debug!(packed = table.is_packed(), "selected k-mer representation");

        let mut reads_seen = 0usize;
        let mut bases = 0u64;
        for (index, read) in reads.into_iter().enumerate() {
            let read = read?;
            self.check_read(index, &read)?;
            table.add_sequence(&read);
            reads_seen += 1;
            bases += read.len() as u64;
        }

        info!(
            reads = reads_seen,
            bases,
            distinct = table.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "k-mer scan complete"
        );
        Ok(table)
    }

    /// Counts the k-mers of all reads on the rayon thread pool.
    ///
    /// Produces the same table as [`count_reads`](Self::count_reads) and
    /// applies the same checks before any counting starts.
    pub fn count_reads_parallel(&self, reads: &[Bytes]) -> Result<FrequencyTable, TopKmerError> {
        let _span = info_span!("count_kmers_parallel", k = self.k.get()).entered();
        let start = Instant::now();

        for (index, read) in reads.iter().enumerate() {
            self.check_read(index, read)?;
        }

        let k = self.k;
        let table = if k.is_encodable() {
            let map: DashFx<u64> = DashMap::with_hasher(BuildHasherDefault::default());
            reads.par_iter().for_each(|read| {
                for code in RollingEncoder::new(read, k) {
                    *map.entry(code).or_insert(0) += 1;
                }
            });
            FrequencyTable {
                k,
                counts: Counts::Packed(map.into_iter().collect()),
            }
        } else {
            let map: DashFx<Bytes> = DashMap::with_hasher(BuildHasherDefault::default());
            reads.par_iter().for_each(|read| {
                for window in read.windows(k.get()) {
                    if let Some(mut count) = map.get_mut(window) {
                        *count += 1;
                    } else {
                        *map.entry(Bytes::copy_from_slice(window)).or_insert(0) += 1;
                    }
                }
            });
            FrequencyTable {
                k,
                counts: Counts::Raw(map.into_iter().collect()),
            }
        };

        info!(
            reads = reads.len(),
            distinct = table.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "parallel k-mer scan complete"
        );
        Ok(table)
    }

    fn check_read(&self, index: usize, read: &[u8]) -> Result<(), TopKmerError> {
        let must_fit = index == 0 || self.length_check == LengthCheck::EveryRead;
        if must_fit && read.len() < self.k.get() {
            return Err(ConfigError::KmerLongerThanRead {
                k: self.k.get(),
                read_len: read.len(),
                read: index,
            }
            .into());
        }
        if self.strict_bases {
            if let Some(err) = find_invalid(read) {
                return Err(TopKmerError::invalid_base(err, index));
            }
        }
        Ok(())
    }
}
