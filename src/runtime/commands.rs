use std::fmt;

use clap::Subcommand;

use crate::command;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Print the reference blocks of a single cigar string
    Cigar2blocks(command::Cigar2BlocksCMD),
    /// Convert exonerate "cigar:" lines to a BED12 track
    Exonerate2bed(command::Exonerate2BedCMD),
    /// Convert mapped BAM/CRAM records to BED
    Bam2bed(command::Bam2BedCMD),
}

impl Commands {
    pub fn try_execute(&mut self) -> anyhow::Result<()> {
        match self {
            Commands::Cigar2blocks(cmd) => cmd.try_execute(),
            Commands::Exonerate2bed(cmd) => cmd.try_execute(),
            Commands::Bam2bed(cmd) => cmd.try_execute(),
        }
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmd = match self {
            Commands::Cigar2blocks(_) => "Cigar2blocks",
            Commands::Exonerate2bed(_) => "Exonerate2bed",
            Commands::Bam2bed(_) => "Bam2bed",
        };
        write!(f, "{}", cmd)
    }
}
