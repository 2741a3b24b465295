//! Fuzz target for top-N selection.
//!
//! The first byte picks N and k; the rest is one read. The selection must be
//! sorted and hold min(N, distinct) entries plus any reported ties.

#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use topkmer::counter::KmerCounter;
use topkmer::kmer::KmerLength;
use topkmer::top::{select_top, TopCount};

fuzz_target!(|data: &[u8]| {
    let Some((&params, read)) = data.split_first() else {
        return;
    };
    let n = usize::from(params & 0x0f) + 1;
    let k = usize::from(params >> 4) + 1;
    if read.len() < k {
        return;
    }

    let Ok(k) = KmerLength::new(k) else { return };
    let Ok(n) = TopCount::new(n) else { return };

    let Ok(table) = KmerCounter::new(k).count_reads([Bytes::copy_from_slice(read)]) else {
        return;
    };
    let distinct = table.len();
    let top = select_top(table, n, true);

    assert_eq!(top.len(), n.get().min(distinct) + top.tied_extra.unwrap_or(0));
    assert!(top.kmers.windows(2).all(|w| w[0].count >= w[1].count));
});
