//! Top-N selection over a [`FrequencyTable`].
//!
//! The table is inverted into buckets keyed by count, then walked from the
//! highest count down. Within a bucket, k-mers come out in the order they were
//! inserted into it, which follows the hash table's iteration order. That order
//! is not meaningful and callers should not rely on it.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use topkmer::counter::KmerCounter;
//! use topkmer::kmer::KmerLength;
//! use topkmer::top::{select_top, TopCount};
//!
//! let table = KmerCounter::new(KmerLength::new(2)?)
//!     .count_reads([Bytes::from_static(b"AAAA")])?;
//! let top = select_top(table, TopCount::new(5)?, false);
//!
//! assert_eq!(top.kmers.len(), 1);
//! assert_eq!(top.kmers[0].kmer, "AA");
//! assert_eq!(top.kmers[0].count, 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{collections::BTreeMap, num::NonZeroUsize, time::Instant};

use bytes::Bytes;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::{
    counter::{Counts, FrequencyTable},
    error::ConfigError,
    kmer::{decode, KmerLength},
};

/// Number of k-mers to report, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopCount(NonZeroUsize);

impl TopCount {
    /// Validates a top-N count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTopCount`] if `n` is zero.
    pub const fn new(n: usize) -> Result<Self, ConfigError> {
        match NonZeroUsize::new(n) {
            Some(n) => Ok(Self(n)),
            None => Err(ConfigError::ZeroTopCount),
        }
    }

    /// The count as a plain `usize`.
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// A k-mer and its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedKmer {
    pub kmer: String,
    pub count: u64,
}

/// The most frequent k-mers of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopKmers {
    /// K-mer length.
    pub k: usize,
    /// Number of k-mers requested.
    pub requested: usize,
    /// K-mers by descending count.
    pub kmers: Vec<RankedKmer>,
    /// Number of k-mers appended because they tie with the last requested
    /// one. `None` when tie extension was not asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tied_extra: Option<usize>,
}

impl TopKmers {
    fn empty(k: KmerLength, n: TopCount, include_tied: bool) -> Self {
        Self {
            k: k.get(),
            requested: n.get(),
            kmers: Vec::new(),
            tied_extra: include_tied.then_some(0),
        }
    }

    /// Number of reported k-mers, tied ones included.
    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    /// Returns `true` if no k-mer was reported.
    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    /// Iterates over the reported k-mers by descending count.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedKmer> {
        self.kmers.iter()
    }
}

impl<'a> IntoIterator for &'a TopKmers {
    type Item = &'a RankedKmer;
    type IntoIter = std::slice::Iter<'a, RankedKmer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Selects the `n` most frequent k-mers, consuming the table.
///
/// If the table holds fewer than `n` k-mers, all of them are returned. With
/// `include_tied`, k-mers past the `n`-th that share its count are appended
/// and counted in [`TopKmers::tied_extra`].
///
/// If the result list, or its extension by tied k-mers, cannot be allocated,
/// a warning is logged and an empty result is returned.
pub fn select_top(table: FrequencyTable, n: TopCount, include_tied: bool) -> TopKmers {
    match table.into_parts() {
        (k, Counts::Packed(counts)) => rank(counts, k, n, include_tied, |code| decode(code, k)),
        (k, Counts::Raw(counts)) => rank(counts, k, n, include_tied, |kmer: Bytes| {
            String::from_utf8_lossy(&kmer).into_owned()
        }),
    }
}

fn rank<K, F>(
    counts: FxHashMap<K, u64>,
    k: KmerLength,
    n: TopCount,
    include_tied: bool,
    render: F,
) -> TopKmers
where
    F: Fn(K) -> String,
{
    let _span = info_span!("select_top", distinct = counts.len(), n = n.get()).entered();
    let start = Instant::now();

    let mut top = TopKmers::empty(k, n, include_tied);
    if !try_grow(&mut top.kmers, n.get().min(counts.len())) {
        return top;
    }

    let mut buckets = invert(counts);
    let mut last_bucket = None;
    while top.kmers.len() < n.get() {
        let Some((count, keys)) = buckets.pop_last() else {
            break;
        };
        let mut keys = keys.into_iter();
        let wanted = n.get() - top.kmers.len();
        top.kmers.extend(keys.by_ref().take(wanted).map(|key| RankedKmer {
            kmer: render(key),
            count,
        }));
        last_bucket = Some((count, keys));
    }

    // Ties with the n-th k-mer are whatever is left of its bucket
    if let Some((count, rest)) = last_bucket.filter(|_| include_tied) {
        if !try_grow(&mut top.kmers, rest.len()) {
            return TopKmers::empty(k, n, include_tied);
        }
        top.tied_extra = Some(rest.len());
        top.kmers.extend(rest.map(|key| RankedKmer {
            kmer: render(key),
            count,
        }));
    }

    info!(
        reported = top.kmers.len(),
        tied_extra = ?top.tied_extra,
        elapsed_ms = start.elapsed().as_millis(),
        "top k-mer selection complete"
    );
    top
}

/// Reserves room for `additional` more entries so that a failed allocation
/// can be reported instead of aborting.
fn try_grow(kmers: &mut Vec<RankedKmer>, additional: usize) -> bool {
    match kmers.try_reserve(additional) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                len = kmers.len(),
                additional,
                %err,
                "unable to allocate ranked k-mer list, returning no k-mers"
            );
            false
        }
    }
}

/// Groups keys by count, lowest count first.
fn invert<K>(counts: FxHashMap<K, u64>) -> BTreeMap<u64, Vec<K>> {
    let mut buckets: BTreeMap<u64, Vec<K>> = BTreeMap::new();
    for (key, count) in counts {
        buckets.entry(count).or_default().push(key);
    }
    buckets
}
