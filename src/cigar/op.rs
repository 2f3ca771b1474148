use std::fmt;
use std::str::FromStr;

use super::CigarError;

///////////////////////////////
/// Kind of a cigar run. Only these three are understood; anything else is rejected at parse time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarOpKind {
    /// M: aligned bases, match or mismatch
    Match,
    /// I: bases present in the query but not the reference
    Insertion,
    /// D: bases present in the reference but not the query
    Deletion,
}

impl CigarOpKind {
    pub fn from_code(code: char) -> Option<CigarOpKind> {
        match code {
            'M' => Some(CigarOpKind::Match),
            'I' => Some(CigarOpKind::Insertion),
            'D' => Some(CigarOpKind::Deletion),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            CigarOpKind::Match => 'M',
            CigarOpKind::Insertion => 'I',
            CigarOpKind::Deletion => 'D',
        }
    }
}

///////////////////////////////
/// One run of a cigar string, e.g. 10M
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: CigarOpKind,
    pub len: u32,
}

impl CigarOp {
    pub fn new(kind: CigarOpKind, len: u32) -> CigarOp {
        CigarOp { kind, len }
    }

    pub fn is_match(&self) -> bool {
        self.kind == CigarOpKind::Match
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.kind.code())
    }
}

///////////////////////////////
/// Ordered list of cigar runs, as they appear in the input string.
/// Formats back in the compact ensembl dialect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CigarSequence {
    ops: Vec<CigarOp>,
}

impl CigarSequence {
    pub fn new(ops: Vec<CigarOp>) -> CigarSequence {
        CigarSequence { ops }
    }

    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CigarOp> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Total run length of all operations of one kind
    pub fn total_len(&self, kind: CigarOpKind) -> u64 {
        self.ops
            .iter()
            .filter(|op| op.kind == kind)
            .map(|op| op.len as u64)
            .sum()
    }

    pub fn contains(&self, kind: CigarOpKind) -> bool {
        self.ops.iter().any(|op| op.kind == kind)
    }

    pub fn reversed(&self) -> CigarSequence {
        CigarSequence {
            ops: self.ops.iter().rev().copied().collect(),
        }
    }
}

impl From<Vec<CigarOp>> for CigarSequence {
    fn from(ops: Vec<CigarOp>) -> Self {
        CigarSequence::new(ops)
    }
}

impl fmt::Display for CigarSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

///////////////////////////////
/// Textual cigar flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarDialect {
    /// Compact form, "10M2D5M". A run without digits has length 1
    Ensembl,
    /// Whitespace separated letter/length pairs, "M 10 D 2 M 5"
    Exonerate,
}

impl FromStr for CigarDialect {
    type Err = CigarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ensembl" => Ok(CigarDialect::Ensembl),
            "exonerate" => Ok(CigarDialect::Exonerate),
            _ => Err(CigarError::InvalidDialect {
                dialect: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CigarDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CigarDialect::Ensembl => "ensembl",
            CigarDialect::Exonerate => "exonerate",
        };
        write!(f, "{}", name)
    }
}
