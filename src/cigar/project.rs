use std::fmt;
use std::str::FromStr;

use super::{parse, CigarDialect, CigarError, CigarOp, CigarOpKind, CigarSequence};

///////////////////////////////
/// Strand of the alignment on the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "1" => Ok(Strand::Forward),
            "-" | "-1" => Ok(Strand::Reverse),
            _ => Err(CigarError::InvalidStrand {
                strand: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

///////////////////////////////
/// Which gap operation marks an intron. The intron kind stays in the cigar and
/// separates blocks on the reference; the other gap kind is dropped before the walk.
///
/// Ensembl and exonerate do not agree on which letter is used, so this is always
/// given explicitly by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntronPolicy {
    Insertion,
    Deletion,
}

impl IntronPolicy {
    pub fn from_intron_is_insertion(intron_is_insertion: bool) -> IntronPolicy {
        if intron_is_insertion {
            IntronPolicy::Insertion
        } else {
            IntronPolicy::Deletion
        }
    }

    pub fn intron_kind(&self) -> CigarOpKind {
        match self {
            IntronPolicy::Insertion => CigarOpKind::Insertion,
            IntronPolicy::Deletion => CigarOpKind::Deletion,
        }
    }

    /// The operation kind removed before walking the reference
    pub fn ignored_kind(&self) -> CigarOpKind {
        match self {
            IntronPolicy::Insertion => CigarOpKind::Deletion,
            IntronPolicy::Deletion => CigarOpKind::Insertion,
        }
    }
}

impl FromStr for IntronPolicy {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" | "i" => Ok(IntronPolicy::Insertion),
            "D" | "d" => Ok(IntronPolicy::Deletion),
            _ => Err(CigarError::InvalidIntronPolicy {
                intron: s.to_string(),
            }),
        }
    }
}

///////////////////////////////
/// Half-open 0-based reference interval [start, end), as in BED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentSpan {
    pub start: u64,
    pub end: u64,
}

impl AlignmentSpan {
    pub fn new(start: u64, end: u64) -> AlignmentSpan {
        AlignmentSpan { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///////////////////////////////
/// Reference interval covered by one merged match run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub start: u64,
    pub end: u64,
}

impl Block {
    pub fn new(start: u64, end: u64) -> Block {
        Block { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(u64, u64)> for Block {
    fn from((start, end): (u64, u64)) -> Self {
        Block::new(start, end)
    }
}

///////////////////////////////
/// Project a cigar onto the reference, returning the match blocks in reference order.
///
/// The steps are done in a fixed order: orient by strand, drop the non-intron gap kind,
/// merge the match runs that became adjacent, walk the reference, shift by the span start,
/// and finally check that the last block ends exactly at the span end
pub fn project(
    cigar: &CigarSequence,
    span: AlignmentSpan,
    strand: Strand,
    intron: IntronPolicy,
) -> Result<Vec<Block>, CigarError> {
    let oriented = match strand {
        Strand::Forward => cigar.clone(),
        Strand::Reverse => cigar.reversed(),
    };

    let ignored = intron.ignored_kind();
    let kept = oriented.iter().filter(|op| op.kind != ignored).copied();
    let merged = merge_matches(kept);

    //A walk running past u64 cannot end at span.end
    let overflow = CigarError::CoordinateMismatch {
        expected: span.end,
        found: None,
    };

    let mut blocks = Vec::new();
    let mut cursor: u64 = 0;
    for &(kind, len) in &merged {
        let next = cursor.checked_add(len).ok_or_else(|| overflow.clone())?;
        if kind == CigarOpKind::Match && len > 0 {
            blocks.push(Block::new(cursor, next));
        }
        cursor = next;
    }

    let blocks: Vec<Block> = blocks
        .into_iter()
        .map(|b| {
            match (b.start.checked_add(span.start), b.end.checked_add(span.start)) {
                (Some(start), Some(end)) => Ok(Block::new(start, end)),
                _ => Err(overflow.clone()),
            }
        })
        .collect::<Result<_, _>>()?;

    let found = blocks.iter().map(|b| b.end).max();
    if found != Some(span.end) {
        log::debug!(
            "cigar {} ({} strand, intron {:?}) does not fit span {}-{}",
            cigar,
            strand,
            intron.intron_kind(),
            span.start,
            span.end
        );
        return Err(CigarError::CoordinateMismatch {
            expected: span.end,
            found,
        });
    }
    Ok(blocks)
}

/// Sum consecutive match runs into one. Other runs are passed through as they are.
/// Lengths widen to u64 so long merged runs cannot overflow
fn merge_matches(ops: impl Iterator<Item = CigarOp>) -> Vec<(CigarOpKind, u64)> {
    let mut merged: Vec<(CigarOpKind, u64)> = Vec::new();
    for op in ops {
        match merged.last_mut() {
            Some((CigarOpKind::Match, len)) if op.is_match() => *len += op.len as u64,
            _ => merged.push((op.kind, op.len as u64)),
        }
    }
    merged
}

///////////////////////////////
/// Parse and project in one go
pub fn cigar_to_blocks(
    cigar: &str,
    dialect: CigarDialect,
    min_coord: u64,
    max_coord: u64,
    strand: Strand,
    intron: IntronPolicy,
) -> Result<Vec<Block>, CigarError> {
    let cigar = parse(cigar, dialect)?;
    project(&cigar, AlignmentSpan::new(min_coord, max_coord), strand, intron)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigar::parse_ensembl;

    fn blocks(list: &[(u64, u64)]) -> Vec<Block> {
        list.iter().map(|&b| Block::from(b)).collect()
    }

    fn run(
        cigar: &str,
        start: u64,
        end: u64,
        strand: Strand,
        intron_is_insertion: bool,
    ) -> Result<Vec<Block>, CigarError> {
        project(
            &parse_ensembl(cigar).unwrap(),
            AlignmentSpan::new(start, end),
            strand,
            IntronPolicy::from_intron_is_insertion(intron_is_insertion),
        )
    }

    #[test]
    fn deletion_as_intron() {
        let out = run("10M2D5M", 0, 17, Strand::Forward, false).unwrap();
        assert_eq!(out, blocks(&[(0, 10), (12, 17)]));
    }

    #[test]
    fn wrong_policy_is_caught() {
        //D is dropped, leaving 15M which cannot reach 17
        let err = run("10M2D5M", 0, 17, Strand::Forward, true).unwrap_err();
        assert_eq!(
            err,
            CigarError::CoordinateMismatch {
                expected: 17,
                found: Some(15)
            }
        );
        assert_eq!(
            run("10M2D5M", 0, 15, Strand::Forward, true).unwrap(),
            blocks(&[(0, 15)])
        );
    }

    #[test]
    fn insertion_as_intron() {
        assert_eq!(
            run("3M2I4M", 0, 9, Strand::Forward, true).unwrap(),
            blocks(&[(0, 3), (5, 9)])
        );
        //Dropping the I merges the flanking matches
        assert_eq!(
            run("3M2I4M", 0, 7, Strand::Forward, false).unwrap(),
            blocks(&[(0, 7)])
        );
    }

    #[test]
    fn adjacent_matches_merge() {
        assert_eq!(
            run("5M3M", 40, 48, Strand::Forward, false).unwrap(),
            run("8M", 40, 48, Strand::Forward, false).unwrap()
        );
    }

    #[test]
    fn absolute_offset() {
        assert_eq!(
            run("10M2D5M", 1000, 1017, Strand::Forward, false).unwrap(),
            blocks(&[(1000, 1010), (1012, 1017)])
        );
    }

    #[test]
    fn reverse_strand_walks_backwards() {
        assert_eq!(
            run("10M2D5M", 0, 17, Strand::Reverse, false).unwrap(),
            blocks(&[(0, 5), (7, 17)])
        );
    }

    #[test]
    fn mixed_gaps() {
        //I dropped, D kept: 4M + 2M merge
        assert_eq!(
            run("4M1I2M3D5M", 10, 24, Strand::Forward, false).unwrap(),
            blocks(&[(10, 16), (19, 24)])
        );
        //D dropped, I kept
        assert_eq!(
            run("4M1I2M3D5M", 10, 22, Strand::Forward, true).unwrap(),
            blocks(&[(10, 14), (15, 22)])
        );
    }

    #[test]
    fn consecutive_introns() {
        assert_eq!(
            run("5M2D3D5M", 0, 15, Strand::Forward, false).unwrap(),
            blocks(&[(0, 5), (10, 15)])
        );
    }

    #[test]
    fn leading_intron_emits_no_empty_block() {
        assert_eq!(
            run("2D5M", 0, 7, Strand::Forward, false).unwrap(),
            blocks(&[(2, 7)])
        );
    }

    #[test]
    fn trailing_intron_mismatch() {
        assert!(matches!(
            run("5M2D", 0, 7, Strand::Forward, false),
            Err(CigarError::CoordinateMismatch { expected: 7, found: Some(5) })
        ));
    }

    #[test]
    fn span_at_end_of_coordinate_range() {
        let top = u64::MAX;
        assert_eq!(
            run("5M", top - 2, top, Strand::Forward, false),
            Err(CigarError::CoordinateMismatch {
                expected: top,
                found: None
            })
        );
        assert_eq!(
            run("1M1D1M", top - 3, top, Strand::Forward, false).unwrap(),
            blocks(&[(top - 3, top - 2), (top - 1, top)])
        );
        let huge = format!("{}M{}D{}M", u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(
            run(&huge, top - 10, top, Strand::Forward, false),
            Err(CigarError::CoordinateMismatch {
                expected: top,
                found: None
            })
        );
    }

    #[test]
    fn no_match_at_all() {
        assert_eq!(
            run("4D", 0, 4, Strand::Forward, false),
            Err(CigarError::CoordinateMismatch {
                expected: 4,
                found: None
            })
        );
    }

    #[test]
    fn strand_and_policy_names() {
        assert_eq!("+".parse::<Strand>(), Ok(Strand::Forward));
        assert_eq!("1".parse::<Strand>(), Ok(Strand::Forward));
        assert_eq!("-".parse::<Strand>(), Ok(Strand::Reverse));
        assert_eq!("-1".parse::<Strand>(), Ok(Strand::Reverse));
        assert!(matches!(
            ".".parse::<Strand>(),
            Err(CigarError::InvalidStrand { .. })
        ));

        assert_eq!("I".parse::<IntronPolicy>(), Ok(IntronPolicy::Insertion));
        assert_eq!("D".parse::<IntronPolicy>(), Ok(IntronPolicy::Deletion));
        assert!(matches!(
            "M".parse::<IntronPolicy>(),
            Err(CigarError::InvalidIntronPolicy { .. })
        ));
        assert_eq!(IntronPolicy::Insertion.ignored_kind(), CigarOpKind::Deletion);
    }

    #[test]
    fn one_shot() {
        let out = cigar_to_blocks(
            "M 10 D 2 M 5",
            CigarDialect::Exonerate,
            0,
            17,
            Strand::Forward,
            IntronPolicy::Deletion,
        )
        .unwrap();
        assert_eq!(out, blocks(&[(0, 10), (12, 17)]));

        assert!(matches!(
            cigar_to_blocks("", CigarDialect::Ensembl, 0, 0, Strand::Forward, IntronPolicy::Deletion),
            Err(CigarError::MalformedCigar { .. })
        ));
    }
}
