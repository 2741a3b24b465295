//! Validated run configuration.

use crate::{
    cli::Args,
    counter::{KmerCounter, LengthCheck},
    error::ConfigError,
    kmer::KmerLength,
    top::TopCount,
};

/// Everything the counting core needs to know about a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub k: KmerLength,
    pub top: TopCount,
    pub include_tied: bool,
    pub strict_bases: bool,
    pub length_check: LengthCheck,
    pub parallel: bool,
}

impl Config {
    /// Validates the k-mer length and top-N count. All other options start
    /// off.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either number is zero.
    pub fn new(k: usize, top: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            k: KmerLength::new(k)?,
            top: TopCount::new(top)?,
            include_tied: false,
            strict_bases: false,
            length_check: LengthCheck::FirstRead,
            parallel: false,
        })
    }

    /// Builds a configuration from parsed command-line arguments.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Ok(Self::new(args.k, args.top)?
            .include_tied(args.include_tied)
            .strict_bases(args.strict_bases)
            .length_check(if args.every_read {
                LengthCheck::EveryRead
            } else {
                LengthCheck::FirstRead
            })
            .parallel(args.parallel))
    }

    #[must_use]
    pub const fn include_tied(mut self, include_tied: bool) -> Self {
        self.include_tied = include_tied;
        self
    }

    #[must_use]
    pub const fn strict_bases(mut self, strict_bases: bool) -> Self {
        self.strict_bases = strict_bases;
        self
    }

    #[must_use]
    pub const fn length_check(mut self, length_check: LengthCheck) -> Self {
        self.length_check = length_check;
        self
    }

    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The k-mer counter for this configuration.
    pub const fn counter(&self) -> KmerCounter {
        KmerCounter::new(self.k)
            .length_check(self.length_check)
            .strict_bases(self.strict_bases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn rejects_zero_k() {
        assert_eq!(Config::new(0, 5), Err(ConfigError::ZeroKmerLength));
    }

    #[test]
    fn rejects_zero_top() {
        assert_eq!(Config::new(5, 0), Err(ConfigError::ZeroTopCount));
    }

    #[test]
    fn defaults() {
        let config = Config::new(21, 10).unwrap();
        assert_eq!(config.k.get(), 21);
        assert_eq!(config.top.get(), 10);
        assert!(!config.include_tied);
        assert!(!config.strict_bases);
        assert!(!config.parallel);
        assert_eq!(config.length_check, LengthCheck::FirstRead);
    }

    #[test]
    fn from_args_carries_flags() {
        let args = Args::try_parse_from([
            "topkmer",
            "reads.fq",
            "40",
            "3",
            "--include-tied",
            "--strict-bases",
            "--every-read",
        ])
        .unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.k.get(), 40);
        assert!(!config.k.is_encodable());
        assert!(config.include_tied);
        assert!(config.strict_bases);
        assert_eq!(config.length_check, LengthCheck::EveryRead);
        assert!(!config.parallel);
    }

    #[test]
    fn from_args_validates() {
        let args = Args::try_parse_from(["topkmer", "reads.fq", "0", "3"]).unwrap();
        assert_eq!(Config::from_args(&args), Err(ConfigError::ZeroKmerLength));
    }
}
