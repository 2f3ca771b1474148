use std::io::BufRead;

use crate::cigar::{self, AlignmentSpan, CigarDialect, CigarError, IntronPolicy, Strand};
use crate::fileformat::bed::BedRecord;
use crate::runtime;

pub const CIGAR_LINE_PREFIX: &str = "cigar:";

/// "cigar:" tag plus the nine fixed columns before the cigar itself
const NUM_FIXED_FIELDS: usize = 10;

///////////////////////////////
/// One `cigar:` line of exonerate output:
///
/// cigar: query qStart qEnd qStrand target tStart tEnd tStrand score M 10 D 2 M 5
///
/// Start is larger than end when the strand is '-'
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExonerateCigarLine {
    pub query: String,
    pub query_start: u64,
    pub query_end: u64,
    pub query_strand: String,
    pub target: String,
    pub target_start: u64,
    pub target_end: u64,
    pub target_strand: String,
    pub score: i64,
    pub cigar: String,
}

impl ExonerateCigarLine {
    pub fn parse(line: &str) -> Result<ExonerateCigarLine, runtime::Error> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() != Some(&CIGAR_LINE_PREFIX) {
            return Err(runtime::Error::parse_error(
                "exonerate cigar line",
                Some(format!("line does not start with '{}'", CIGAR_LINE_PREFIX)),
            ));
        }
        if fields.len() < NUM_FIXED_FIELDS {
            return Err(runtime::Error::parse_error(
                "exonerate cigar line",
                Some(format!(
                    "expected at least {} fields, got {}",
                    NUM_FIXED_FIELDS,
                    fields.len()
                )),
            ));
        }

        Ok(ExonerateCigarLine {
            query: fields[1].to_string(),
            query_start: parse_field(fields[2], "query start")?,
            query_end: parse_field(fields[3], "query end")?,
            query_strand: fields[4].to_string(),
            target: fields[5].to_string(),
            target_start: parse_field(fields[6], "target start")?,
            target_end: parse_field(fields[7], "target end")?,
            target_strand: fields[8].to_string(),
            score: parse_field(fields[9], "score")?,
            cigar: fields[NUM_FIXED_FIELDS..].join(" "),
        })
    }

    /// Target interval with the ends put in order
    pub fn target_span(&self) -> AlignmentSpan {
        AlignmentSpan::new(
            self.target_start.min(self.target_end),
            self.target_start.max(self.target_end),
        )
    }

    /// BED12 record of the blocks on the target
    pub fn to_bed(&self, intron: IntronPolicy, item_rgb: &str) -> Result<BedRecord, CigarError> {
        let strand: Strand = self.target_strand.parse()?;
        let cigar = cigar::parse(&self.cigar, CigarDialect::Exonerate)?;
        let span = self.target_span();
        let blocks = cigar::project(&cigar, span, strand, intron)?;

        Ok(
            BedRecord::new(&self.target, span.start, span.end, &self.query, 0, strand)
                .with_blocks(blocks, item_rgb),
        )
    }
}

fn parse_field<T: std::str::FromStr>(text: &str, what: &str) -> Result<T, runtime::Error> {
    text.parse().map_err(|_| {
        runtime::Error::parse_error(
            "exonerate cigar line",
            Some(format!("{} '{}' is not a number", what, text)),
        )
    })
}

///////////////////////////////
/// Pulls the `cigar:` lines out of an exonerate output file; all other lines are skipped
pub struct ExonerateReader<R> {
    reader: R,
    buf: String,
    line_no: usize,
}

impl<R: BufRead> ExonerateReader<R> {
    pub fn new(reader: R) -> ExonerateReader<R> {
        ExonerateReader {
            reader,
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Next cigar line with its 1-based line number. The outer error is I/O; the
    /// inner one is a malformed line, which the caller may choose to skip
    pub fn next_record(
        &mut self,
    ) -> std::io::Result<Option<(usize, Result<ExonerateCigarLine, runtime::Error>)>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            if self.buf.starts_with(CIGAR_LINE_PREFIX) {
                let rec = ExonerateCigarLine::parse(self.buf.trim_end());
                return Ok(Some((self.line_no, rec)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigar::Block;

    const FORWARD_LINE: &str = "cigar: est1 0 15 + chr4 1000 1017 + 75 M 10 D 2 M 5";
    const REVERSE_LINE: &str = "cigar: est2 20 0 - chr4 5017 5000 - 60 M 10 D 2 M 5";

    #[test]
    fn parse_line() {
        let rec = ExonerateCigarLine::parse(FORWARD_LINE).unwrap();
        assert_eq!(rec.query, "est1");
        assert_eq!(rec.target, "chr4");
        assert_eq!(rec.target_start, 1000);
        assert_eq!(rec.target_end, 1017);
        assert_eq!(rec.score, 75);
        assert_eq!(rec.cigar, "M 10 D 2 M 5");
    }

    #[test]
    fn parse_bad_lines() {
        assert!(ExonerateCigarLine::parse("vulgar: est1 0 15 +").is_err());
        assert!(ExonerateCigarLine::parse("cigar: est1 0 15 + chr4 1000").is_err());
        assert!(ExonerateCigarLine::parse("cigar: est1 0 15 + chr4 x 1017 + 75 M 17").is_err());
    }

    #[test]
    fn forward_to_bed() {
        let rec = ExonerateCigarLine::parse(FORWARD_LINE).unwrap();
        let bed = rec.to_bed(IntronPolicy::Deletion, "0,0,0").unwrap();
        assert_eq!(bed.start, 1000);
        assert_eq!(bed.end, 1017);
        assert_eq!(
            bed.blocks,
            Some(vec![Block::new(1000, 1010), Block::new(1012, 1017)])
        );
        assert_eq!(bed.block_starts(), "0,12");
    }

    #[test]
    fn reverse_to_bed() {
        let rec = ExonerateCigarLine::parse(REVERSE_LINE).unwrap();
        assert_eq!(rec.target_span(), AlignmentSpan::new(5000, 5017));

        let bed = rec.to_bed(IntronPolicy::Deletion, "0,0,0").unwrap();
        assert_eq!(bed.strand, Strand::Reverse);
        assert_eq!(
            bed.blocks,
            Some(vec![Block::new(5000, 5005), Block::new(5007, 5017)])
        );
    }

    #[test]
    fn wrong_intron_rejected() {
        let rec = ExonerateCigarLine::parse(FORWARD_LINE).unwrap();
        assert!(matches!(
            rec.to_bed(IntronPolicy::Insertion, "0,0,0"),
            Err(CigarError::CoordinateMismatch { .. })
        ));
    }

    #[test]
    fn reader_skips_other_lines() {
        let text = format!(
            "Command line: [exonerate ...]\nHostname: [box]\n{}\nvulgar: est1 0 15 +\n{}\n-- completed exonerate analysis\n",
            FORWARD_LINE, REVERSE_LINE
        );
        let mut reader = ExonerateReader::new(text.as_bytes());

        let (line_no, rec) = reader.next_record().unwrap().unwrap();
        assert_eq!(line_no, 3);
        assert_eq!(rec.unwrap().query, "est1");

        let (line_no, rec) = reader.next_record().unwrap().unwrap();
        assert_eq!(line_no, 5);
        assert_eq!(rec.unwrap().query, "est2");

        assert!(reader.next_record().unwrap().is_none());
    }
}
