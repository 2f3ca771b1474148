use anyhow::Result;
use clap::Args;
use std::io::Write;

use crate::cigar::{self, Block, CigarDialect, IntronPolicy, Strand};

#[derive(Args)]
pub struct Cigar2BlocksCMD {
    /// Cigar string. Quote exonerate cigars, e.g. "M 10 D 2 M 5"
    pub cigar: String,

    #[arg(long = "dialect", value_parser, default_value = "ensembl")]
    /// ensembl or exonerate
    pub dialect: CigarDialect,

    #[arg(long = "start", value_parser = clap::value_parser!(u64))]
    /// 0-based start of the alignment on the reference
    pub start: u64,

    #[arg(long = "end", value_parser = clap::value_parser!(u64))]
    /// End of the alignment on the reference, exclusive
    pub end: u64,

    #[arg(long = "strand", value_parser, allow_hyphen_values = true)]
    /// Strand of the alignment: +, -, 1 or -1
    pub strand: Strand,

    #[arg(long = "intron", value_parser)]
    /// Cigar operation that marks an intron, I or D. The other gap kind is dropped
    pub intron: IntronPolicy,
}

impl Cigar2BlocksCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let blocks = cigar::cigar_to_blocks(
            &self.cigar,
            self.dialect,
            self.start,
            self.end,
            self.strand,
            self.intron,
        )?;
        log::debug!("{} gave {} blocks", self.cigar, blocks.len());

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_blocks(&mut out, &blocks)?;
        Ok(())
    }
}

/// One "start\tend" line per block
pub fn write_blocks<W: Write>(writer: &mut W, blocks: &[Block]) -> std::io::Result<()> {
    for b in blocks {
        writeln!(writer, "{}\t{}", b.start, b.end)?;
    }
    writer.flush()
}
