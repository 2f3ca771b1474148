pub mod bam2bed;
pub mod cigar2blocks;
pub mod exonerate2bed;
pub mod threadcount;

pub use bam2bed::Bam2Bed;
pub use bam2bed::Bam2BedCMD;

pub use cigar2blocks::Cigar2BlocksCMD;

pub use exonerate2bed::Exonerate2Bed;
pub use exonerate2bed::Exonerate2BedCMD;

pub use threadcount::determine_thread_counts_1;

use crate::runtime::ErrorMode;

///////////////////////////////
/// Record counts of one conversion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub written: usize,
    pub skipped: usize,
    pub unmapped: usize,
}

impl std::ops::Add for ConversionStats {
    type Output = ConversionStats;

    fn add(self, other: ConversionStats) -> ConversionStats {
        ConversionStats {
            written: self.written + other.written,
            skipped: self.skipped + other.skipped,
            unmapped: self.unmapped + other.unmapped,
        }
    }
}

///////////////////////////////
/// Apply the error mode to a record that could not be converted.
/// Skip only warns; abort turns the record error into the command error
pub fn handle_record_error<E: std::fmt::Display>(
    mode: ErrorMode,
    what: &str,
    err: E,
) -> anyhow::Result<()> {
    match mode {
        ErrorMode::Skip => {
            log::warn!("Skipping {}: {}", what, err);
            Ok(())
        }
        ErrorMode::Abort => anyhow::bail!("Failed to convert {}: {}", what, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_or_abort() {
        assert!(handle_record_error(ErrorMode::Skip, "line 3", "bad cigar").is_ok());
        let err = handle_record_error(ErrorMode::Abort, "line 3", "bad cigar").unwrap_err();
        assert_eq!(err.to_string(), "Failed to convert line 3: bad cigar");
    }

    #[test]
    fn add_stats() {
        let a = ConversionStats { written: 3, skipped: 1, unmapped: 0 };
        let b = ConversionStats { written: 2, skipped: 0, unmapped: 5 };
        assert_eq!(a + b, ConversionStats { written: 5, skipped: 1, unmapped: 5 });
    }
}
