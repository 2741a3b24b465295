//! Rendering of [`TopKmers`] reports.

use std::io::Write;

use crate::{cli::OutputFormat, error::TopKmerError, top::TopKmers};

/// Writes `top` to `writer` in the requested format.
///
/// ```rust
/// use topkmer::cli::OutputFormat;
/// use topkmer::output::write_top;
/// use topkmer::top::{RankedKmer, TopKmers};
///
/// let top = TopKmers {
///     k: 3,
///     requested: 1,
///     kmers: vec![RankedKmer { kmer: "GAT".to_string(), count: 7 }],
///     tied_extra: None,
/// };
/// let mut out = Vec::new();
/// write_top(&mut out, &top, OutputFormat::Tsv)?;
/// assert_eq!(out, b"GAT\t7\n");
/// # Ok::<(), topkmer::error::TopKmerError>(())
/// ```
pub fn write_top<W: Write>(
    mut writer: W,
    top: &TopKmers,
    format: OutputFormat,
) -> Result<(), TopKmerError> {
    match format {
        OutputFormat::Text => write_text(&mut writer, top)?,
        OutputFormat::Tsv => {
            for entry in top {
                writeln!(writer, "{}\t{}", entry.kmer, entry.count)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, top)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, top: &TopKmers) -> Result<(), TopKmerError> {
    writeln!(
        writer,
        "Top {} frequent k-mers of size {} and their frequencies:",
        top.requested, top.k
    )?;
    writeln!(writer)?;
    for (rank, entry) in top.iter().enumerate() {
        writeln!(writer, "{:>2}.  {} : {}", rank + 1, entry.kmer, entry.count)?;
    }
    if let Some(extra) = top.tied_extra {
        writeln!(writer)?;
        writeln!(
            writer,
            "* {extra} more k-mer(s) are also listed with the same frequency as the last k-mer"
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::top::RankedKmer;

    fn sample(tied_extra: Option<usize>) -> TopKmers {
        let kmers = [("GATT", 12), ("ATTA", 9), ("TTAC", 9)]
            .into_iter()
            .map(|(kmer, count)| RankedKmer {
                kmer: kmer.to_string(),
                count,
            })
            .collect();
        TopKmers {
            k: 4,
            requested: 2,
            kmers,
            tied_extra,
        }
    }

    fn render(top: &TopKmers, format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_top(&mut out, top, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_report() {
        insta::assert_snapshot!(render(&sample(None), OutputFormat::Text), @r###"
        Top 2 frequent k-mers of size 4 and their frequencies:

         1.  GATT : 12
         2.  ATTA : 9
         3.  TTAC : 9
        "###);
    }

    #[test]
    fn text_report_with_ties() {
        let text = render(&sample(Some(1)), OutputFormat::Text);
        assert!(text.ends_with(
            "\n\n* 1 more k-mer(s) are also listed with the same frequency as the last k-mer\n"
        ));
    }

    #[test]
    fn text_rank_is_right_aligned() {
        let mut top = sample(None);
        top.kmers = (0..10)
            .map(|i| RankedKmer {
                kmer: "ACGT".to_string(),
                count: 10 - i,
            })
            .collect();
        let text = render(&top, OutputFormat::Text);
        assert!(text.contains("\n 9.  ACGT : 2\n10.  ACGT : 1\n"));
    }

    #[test]
    fn tsv_report() {
        assert_eq!(
            render(&sample(Some(1)), OutputFormat::Tsv),
            "GATT\t12\nATTA\t9\nTTAC\t9\n"
        );
    }

    #[test]
    fn json_report() {
        insta::assert_snapshot!(render(&sample(Some(1)), OutputFormat::Json), @r###"
        {
          "k": 4,
          "requested": 2,
          "kmers": [
            {
              "kmer": "GATT",
              "count": 12
            },
            {
              "kmer": "ATTA",
              "count": 9
            },
            {
              "kmer": "TTAC",
              "count": 9
            }
          ],
          "tied_extra": 1
        }
        "###);
    }

    #[test]
    fn json_omits_tie_count_when_not_requested() {
        let json = render(&sample(None), OutputFormat::Json);
        assert!(!json.contains("tied_extra"));
    }
}
