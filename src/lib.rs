pub mod cigar;
pub mod command;
pub mod fileformat;
pub mod runtime;

pub use cigar::cigar_to_blocks;
pub use cigar::parse;
pub use cigar::project;
pub use cigar::CigarError;
