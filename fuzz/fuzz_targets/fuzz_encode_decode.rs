//! Fuzz target for the encode/decode roundtrip.
//!
//! Decoding the code of a k-mer gives back its bases, with every non-ACGT
//! byte read back as `A`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use topkmer::kmer::{decode_to_bytes, encode, KmerLength, RollingEncoder};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 32 {
        return;
    }

    let Ok(k) = KmerLength::new(data.len()) else {
        return;
    };

    let decoded = decode_to_bytes(encode(data), k);
    let expected: Vec<u8> = data
        .iter()
        .map(|&b| if matches!(b, b'C' | b'G' | b'T') { b } else { b'A' })
        .collect();
    assert_eq!(decoded.as_ref(), expected.as_slice(), "Roundtrip failed");

    let rolled: Vec<u64> = RollingEncoder::new(data, k).collect();
    assert_eq!(rolled, vec![encode(data)]);
});
