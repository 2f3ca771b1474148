use std::io::Write;

use itertools::Itertools;

use crate::cigar::{Block, Strand};
use crate::runtime;

pub const DEFAULT_RGB: &str = "0,0,0";

///////////////////////////////
/// One BED line. Written as BED6 unless blocks are attached, in which case all 12 columns are written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BedRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub score: u32,
    pub strand: Strand,

    pub item_rgb: String,
    pub blocks: Option<Vec<Block>>,
}

impl BedRecord {
    pub fn new<C: Into<String>, N: Into<String>>(
        chrom: C,
        start: u64,
        end: u64,
        name: N,
        score: u32,
        strand: Strand,
    ) -> BedRecord {
        BedRecord {
            chrom: chrom.into(),
            start,
            end,
            name: name.into(),
            score,
            strand,
            item_rgb: DEFAULT_RGB.to_string(),
            blocks: None,
        }
    }

    /// Attach blocks in absolute coordinates; they are stored relative to the record when written
    pub fn with_blocks(mut self, blocks: Vec<Block>, item_rgb: &str) -> BedRecord {
        self.blocks = Some(blocks);
        self.item_rgb = item_rgb.to_string();
        self
    }

    pub fn block_sizes(&self) -> String {
        match &self.blocks {
            Some(blocks) => blocks.iter().map(|b| b.len()).join(","),
            None => String::new(),
        }
    }

    pub fn block_starts(&self) -> String {
        match &self.blocks {
            Some(blocks) => blocks.iter().map(|b| b.start - self.start).join(","),
            None => String::new(),
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.end, self.name, self.score, self.strand
        )?;
        if let Some(blocks) = &self.blocks {
            //Thick part is the whole alignment
            write!(
                writer,
                "\t{}\t{}\t{}\t{}\t{}\t{}",
                self.start,
                self.end,
                self.item_rgb,
                blocks.len(),
                self.block_sizes(),
                self.block_starts()
            )?;
        }
        writeln!(writer)
    }
}

/// UCSC track line
pub fn write_track_header<W: Write>(
    writer: &mut W,
    name: &str,
    description: &str,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "track name={} description=\"{}\" useScore=0",
        name, description
    )
}

/// Check an itemRgb value such as "255,0,0"; used as a clap value parser
pub fn parse_rgb(s: &str) -> Result<String, runtime::Error> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.trim().parse::<u8>().is_err()) {
        return Err(runtime::Error::invalid_option(
            "rgb",
            format!("expected three comma separated values 0-255, got '{}'", s),
        ));
    }
    Ok(s.to_string())
}
