//! End-to-end runs: read the FASTQ input, count k-mers, select the most
//! frequent ones and write the report.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{
    cli::OutputFormat,
    config::Config,
    counter::{FrequencyTable, KmerCounter},
    error::TopKmerError,
    kmer::KmerLength,
    output::write_top,
    reader::{read_all_sequences, read_sequences, Input},
    top::{select_top, TopKmers},
};

/// Counts every k-mer of the input.
///
/// Reads are streamed one at a time, or loaded up front and counted on the
/// rayon pool when `config.parallel` is set.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, or if a read fails
/// the configured checks.
pub fn count_kmers(input: &Input, config: &Config) -> Result<FrequencyTable, TopKmerError> {
    info!(input = %input, k = config.k.get(), parallel = config.parallel, "counting k-mers");
    let counter = config.counter();
    if config.parallel {
        counter.count_reads_parallel(&read_all_sequences(input)?)
    } else {
        counter.try_count_reads(read_sequences(input)?)
    }
}

/// Counts k-mers and selects the most frequent ones.
pub fn top_kmers(input: &Input, config: &Config) -> Result<TopKmers, TopKmerError> {
    let table = count_kmers(input, config)?;
    Ok(select_top(table, config.top, config.include_tied))
}

/// Counts k-mers and writes the report to `writer`.
pub fn run_to_writer<W: Write>(
    input: &Input,
    config: &Config,
    format: OutputFormat,
    writer: W,
) -> Result<TopKmers, TopKmerError> {
    let top = top_kmers(input, config)?;
    write_top(writer, &top, format)?;
    Ok(top)
}

/// Counts k-mers and writes the report to stdout and, if given, to `output`.
///
/// # Errors
///
/// Returns an error on read, parse, configuration or write failures.
pub fn run_with_options(
    input: &Input,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<TopKmers, TopKmerError> {
    let top = run_to_writer(input, config, format, BufWriter::new(io::stdout().lock()))?;

    if let Some(path) = output {
        let file = File::create(path).map_err(|source| TopKmerError::Write { source })?;
        write_top(BufWriter::new(file), &top, format)?;
        info!(path = %path.display(), "report written");
    }

    Ok(top)
}

/// Counts the k-mers of a FASTQ file and returns them as strings.
///
/// # Example
///
/// ```rust,no_run
/// use topkmer::run::count_kmers_in_file;
///
/// let counts = count_kmers_in_file("reads.fq", 21)?;
/// println!("Found {} distinct k-mers", counts.len());
/// # Ok::<(), topkmer::error::TopKmerError>(())
/// ```
pub fn count_kmers_in_file<P: AsRef<Path>>(
    path: P,
    k: usize,
) -> Result<HashMap<String, u64>, TopKmerError> {
    let k = KmerLength::new(k)?;
    let input = Input::File(path.as_ref().to_path_buf());
    let table = KmerCounter::new(k).try_count_reads(read_sequences(&input)?)?;
    Ok(table.into_counts())
}
