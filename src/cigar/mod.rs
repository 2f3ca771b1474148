//! CIGAR strings to reference block coordinates.
//!
//! Two dialects are understood (ensembl "10M2D5M" and exonerate "M 10 D 2 M 5").
//! Both parse into the same [`CigarSequence`], which [`project`] turns into the
//! match blocks of the alignment, in 0-based half-open coordinates as used by BED.

mod error;
mod op;
mod parse;
mod project;

pub use error::CigarError;

pub use op::CigarDialect;
pub use op::CigarOp;
pub use op::CigarOpKind;
pub use op::CigarSequence;

pub use parse::parse;
pub use parse::parse_ensembl;
pub use parse::parse_exonerate;

pub use project::cigar_to_blocks;
pub use project::project;
pub use project::AlignmentSpan;
pub use project::Block;
pub use project::IntronPolicy;
pub use project::Strand;
