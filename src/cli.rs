//! Command-line interface definition.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Find the most frequent k-mers in the reads of a FASTQ file.
#[derive(Parser, Debug)]
#[command(name = "topkmer")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to a FASTQ file (use "-" for stdin)
    pub path: PathBuf,

    /// K-mer length (k-mers up to 32 bases are counted in packed form)
    pub k: usize,

    /// Number of most frequent k-mers to report
    pub top: usize,

    /// Also list k-mers beyond the top N that tie with the last one
    #[arg(short = 't', long)]
    pub include_tied: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write the report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail on reads containing bases other than A, C, G and T
    #[arg(long)]
    pub strict_bases: bool,

    /// Require every read, not just the first, to be at least k bases long
    #[arg(long)]
    pub every_read: bool,

    /// Count k-mers on all cores (loads every read into memory first)
    #[arg(short, long)]
    pub parallel: bool,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress informational output (only output the report)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for the top k-mer report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Numbered list with a header line
    #[default]
    Text,
    /// Tab-separated values (kmer\tcount)
    Tsv,
    /// JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_positional_arguments() {
        let args = Args::try_parse_from(["topkmer", "reads.fq", "21", "10"]).unwrap();
        assert_eq!(args.path, PathBuf::from("reads.fq"));
        assert_eq!(args.k, 21);
        assert_eq!(args.top, 10);
        assert!(!args.include_tied);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.output.is_none());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "topkmer", "reads.fq", "40", "5", "-t", "--format", "json", "-o", "out.txt", "-p",
            "-vv",
        ])
        .unwrap();
        assert!(args.include_tied);
        assert!(args.parallel);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["topkmer", "reads.fq", "3", "5", "-q", "-v"]).is_err());
    }

    #[test]
    fn rejects_negative_k() {
        assert!(Args::try_parse_from(["topkmer", "reads.fq", "-3", "5"]).is_err());
    }
}
