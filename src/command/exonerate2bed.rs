use anyhow::Context;
use anyhow::Result;
use clap::Args;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::cigar::IntronPolicy;
use crate::command::{handle_record_error, ConversionStats};
use crate::fileformat::bed::{parse_rgb, write_track_header, DEFAULT_RGB};
use crate::fileformat::ExonerateReader;
use crate::runtime::{self, Config, ErrorMode};

pub const DEFAULT_TRACK_NAME: &str = "untitled";
pub const DEFAULT_DESCRIPTION: &str = "none given";

#[derive(Args)]
pub struct Exonerate2BedCMD {
    #[arg(short = 'i', value_parser)]
    /// Exonerate output containing "cigar:" lines
    pub path_in: PathBuf,

    #[arg(short = 'o', value_parser)]
    /// BED file to write. Defaults to the input path with a .bed extension
    pub path_out: Option<PathBuf>,

    #[arg(long = "intron", value_parser)]
    /// Cigar operation that marks an intron on the target, I or D. The other gap kind is dropped
    pub intron: IntronPolicy,

    #[arg(long = "track", default_value = DEFAULT_TRACK_NAME)]
    /// Unbroken string to use as the track name
    pub track: String,

    #[arg(long = "description", default_value = DEFAULT_DESCRIPTION)]
    /// Description of the track
    pub description: String,

    #[arg(long = "rgb", value_parser = parse_rgb, default_value = DEFAULT_RGB)]
    /// Comma separated colour of the track
    pub rgb: String,
}

impl Exonerate2BedCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        if self.track.chars().any(char::is_whitespace) {
            return Err(runtime::Error::invalid_option("track", "track name cannot contain whitespace").into());
        }

        let path_out = self
            .path_out
            .clone()
            .unwrap_or_else(|| self.path_in.with_extension("bed"));

        let stats = Exonerate2Bed::run(&Exonerate2Bed {
            path_in: self.path_in.clone(),
            path_out,
            intron: self.intron,
            track: self.track.clone(),
            description: self.description.clone(),
            rgb: self.rgb.clone(),
            error_mode: Config::get().error_mode,
        })?;

        log::info!(
            "Exonerate2Bed has finished succesfully; wrote {} records, skipped {}",
            stats.written,
            stats.skipped
        );
        Ok(())
    }
}

pub struct Exonerate2Bed {
    pub path_in: PathBuf,
    pub path_out: PathBuf,
    pub intron: IntronPolicy,
    pub track: String,
    pub description: String,
    pub rgb: String,
    pub error_mode: ErrorMode,
}

impl Exonerate2Bed {
    /// Run the algorithm
    pub fn run(params: &Exonerate2Bed) -> Result<ConversionStats> {
        if !params.path_in.exists() {
            return Err(runtime::Error::file_not_found(&params.path_in).into());
        }
        let file_in = File::open(&params.path_in)
            .with_context(|| format!("Could not open {:?}", params.path_in))?;
        let mut reader = ExonerateReader::new(BufReader::new(file_in));

        let file_out = File::create(&params.path_out)
            .with_context(|| format!("Could not create output file {:?}", params.path_out))?;
        let mut writer = BufWriter::new(file_out);

        let result = Self::convert(params, &mut reader, &mut writer);
        drop(writer);
        if result.is_err() {
            //No half-written BED is left behind when the command fails
            if let Err(e) = fs::remove_file(&params.path_out) {
                log::warn!("Could not remove partial output {:?}: {}", params.path_out, e);
            }
        }
        result
    }

    fn convert<R: BufRead, W: Write>(
        params: &Exonerate2Bed,
        reader: &mut ExonerateReader<R>,
        writer: &mut W,
    ) -> Result<ConversionStats> {
        write_track_header(writer, &params.track, &params.description)?;

        let mut stats = ConversionStats::default();
        while let Some((line_no, rec)) = reader.next_record()? {
            let bed = match rec {
                Ok(rec) => rec
                    .to_bed(params.intron, &params.rgb)
                    .map_err(anyhow::Error::from),
                Err(e) => Err(anyhow::Error::from(e)),
            };

            match bed {
                Ok(bed) => {
                    bed.write(writer)?;
                    stats.written += 1;
                }
                Err(e) => {
                    let what = format!("{:?} line {}", params.path_in, line_no);
                    handle_record_error(params.error_mode, &what, e)?;
                    stats.skipped += 1;
                }
            }
        }
        writer.flush()?;
        Ok(stats)
    }
}
