//! Fuzz target for `try_encode`.
//!
//! Arbitrary bytes are either accepted, in which case the code matches the
//! lenient encoding, or rejected at the first non-ACGT byte.

#![no_main]

use libfuzzer_sys::fuzz_target;
use topkmer::kmer::{encode, find_invalid, try_encode};

fuzz_target!(|data: &[u8]| {
    if data.len() > 32 {
        return;
    }

    match try_encode(data) {
        Ok(code) => {
            assert!(find_invalid(data).is_none());
            assert_eq!(code, encode(data));
        }
        Err(err) => {
            assert!(
                err.position < data.len(),
                "Error position {} out of bounds for data len {}",
                err.position,
                data.len()
            );
            assert_eq!(err.base, data[err.position]);
            assert!(data[..err.position]
                .iter()
                .all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')));
        }
    }
});
