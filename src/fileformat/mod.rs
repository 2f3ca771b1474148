pub mod bed;
pub mod exonerate;

pub use bed::BedRecord;
pub use exonerate::ExonerateCigarLine;
pub use exonerate::ExonerateReader;
