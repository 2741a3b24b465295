//! Count the k-mers of FASTQ reads and report the most frequent ones.
//!
//! Short k-mers (`k <= 32`) are packed two bits per base into a `u64`
//! before counting; longer ones are counted as raw byte strings. The
//! [`top`] module then ranks the table by count, optionally extending the
//! list with every k-mer tied with the last one.
//!
//! ```rust
//! use bytes::Bytes;
//! use topkmer::{counter::KmerCounter, kmer::KmerLength, top::{select_top, TopCount}};
//!
//! let k = KmerLength::new(2)?;
//! let reads = [Bytes::from_static(b"AAAA"), Bytes::from_static(b"AAAC")];
//! let table = KmerCounter::new(k).count_reads(reads)?;
//!
//! let top = select_top(table, TopCount::new(1)?, false);
//! assert_eq!(top.kmers[0].kmer, "AA");
//! assert_eq!(top.kmers[0].count, 5);
//! # Ok::<(), topkmer::error::TopKmerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod kmer;
pub mod logging;
pub mod output;
pub mod reader;
pub mod run;
pub mod top;
