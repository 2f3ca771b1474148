use anyhow::Context;
use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use itertools::Itertools;
use rust_htslib::bam;
use rust_htslib::bam::record::Cigar;
use rust_htslib::bam::Read;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cigar::{self, AlignmentSpan, CigarError, CigarOp, CigarOpKind, CigarSequence, IntronPolicy, Strand};
use crate::command::threadcount::threads_per_worker;
use crate::command::{determine_thread_counts_1, handle_record_error, ConversionStats};
use crate::fileformat::bed::{BedRecord, DEFAULT_RGB};
use crate::runtime::{self, Config, ErrorMode};

#[derive(Args)]
pub struct Bam2BedCMD {
    #[arg(short = 'i', long = "bams", value_parser, value_delimiter = ',', num_args = 1.., required = true)]
    /// BAM or CRAM file(s). Must be indexed if a region is given
    pub path_in: Vec<PathBuf>,

    #[arg(short = 'o', long = "beds", value_parser, value_delimiter = ',', num_args = 1..)]
    /// BED file(s) to write. One file takes all inputs; several must match the inputs one to one. Default is stdout
    pub path_out: Vec<PathBuf>,

    #[arg(short = 'r', long = "region", value_delimiter = ',', num_args = 1..)]
    /// samtools region string(s). One region is used for all inputs; several must match the inputs one to one
    pub regions: Vec<String>,

    #[arg(long = "blocks")]
    /// Write BED12 with one block per merged match run of the CIGAR
    pub blocks: bool,

    #[arg(long = "intron", value_parser)]
    /// Cigar operation that marks an intron, I or D. Required with --blocks
    pub intron: Option<IntronPolicy>,

    //Thread settings
    #[arg(short = '@', value_parser = clap::value_parser!(usize))]
    num_threads_total: Option<usize>,
}

impl Bam2BedCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let num_threads_total = determine_thread_counts_1(self.num_threads_total)?;
        log::info!("Using threads {}", num_threads_total);

        let intron = match (self.blocks, self.intron) {
            (true, None) => {
                return Err(runtime::Error::invalid_option(
                    "intron",
                    "--blocks needs --intron I or --intron D",
                )
                .into())
            }
            (true, Some(intron)) => Some(intron),
            (false, Some(_)) => {
                log::warn!("--intron has no effect without --blocks");
                None
            }
            (false, None) => None,
        };

        let groups = plan_groups(&self.path_in, &self.path_out, &self.regions)?;

        let stats = Bam2Bed::run(&Bam2Bed {
            groups,
            intron,
            num_threads: num_threads_total,
            error_mode: Config::get().error_mode,
        })?;

        log::info!(
            "Bam2Bed has finished succesfully; wrote {} records, skipped {}, {} unmapped",
            stats.written,
            stats.skipped,
            stats.unmapped
        );
        Ok(())
    }
}

///////////////////////////////
/// One input BAM, optionally restricted to a region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bam2BedJob {
    pub path_in: PathBuf,
    pub region: Option<String>,
}

///////////////////////////////
/// Inputs written one after the other into the same output. None is stdout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bam2BedGroup {
    pub path_out: Option<PathBuf>,
    pub jobs: Vec<Bam2BedJob>,
}

/// Pair up inputs, outputs and regions
pub fn plan_groups(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    regions: &[String],
) -> Result<Vec<Bam2BedGroup>, runtime::Error> {
    if inputs.is_empty() {
        return Err(runtime::Error::invalid_option("bams", "at least one input is required"));
    }

    let jobs: Vec<Bam2BedJob> = match regions.len() {
        0 => inputs
            .iter()
            .map(|p| Bam2BedJob { path_in: p.clone(), region: None })
            .collect(),
        1 => inputs
            .iter()
            .map(|p| Bam2BedJob { path_in: p.clone(), region: Some(regions[0].clone()) })
            .collect(),
        n if n == inputs.len() => inputs
            .iter()
            .zip(regions)
            .map(|(p, r)| Bam2BedJob { path_in: p.clone(), region: Some(r.clone()) })
            .collect(),
        n => {
            return Err(runtime::Error::invalid_option(
                "region",
                format!("got {} regions for {} inputs", n, inputs.len()),
            ))
        }
    };

    let mut seen = HashSet::new();
    if let Some(dup) = outputs.iter().find(|o| !seen.insert(*o)) {
        return Err(runtime::Error::invalid_option(
            "beds",
            format!("{:?} is given more than once as an output", dup),
        ));
    }

    match outputs.len() {
        0 => Ok(vec![Bam2BedGroup { path_out: None, jobs }]),
        1 => Ok(vec![Bam2BedGroup { path_out: Some(outputs[0].clone()), jobs }]),
        n if n == inputs.len() => Ok(outputs
            .iter()
            .zip(jobs)
            .map(|(o, job)| Bam2BedGroup { path_out: Some(o.clone()), jobs: vec![job] })
            .collect()),
        n => Err(runtime::Error::invalid_option(
            "beds",
            format!("got {} outputs for {} inputs", n, inputs.len()),
        )),
    }
}

pub struct Bam2Bed {
    pub groups: Vec<Bam2BedGroup>,
    pub intron: Option<IntronPolicy>,
    pub num_threads: usize,
    pub error_mode: ErrorMode,
}

impl Bam2Bed {
    /// Run the algorithm. Output groups are independent and run in parallel
    pub fn run(params: &Bam2Bed) -> Result<ConversionStats> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.groups.len().min(params.num_threads).max(1))
            .build()?;
        let reader_threads = threads_per_worker(params.num_threads, params.groups.len());

        let per_group: Vec<ConversionStats> = pool.install(|| {
            params
                .groups
                .par_iter()
                .map(|group| Bam2Bed::run_group(params, group, reader_threads))
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(per_group
            .into_iter()
            .fold(ConversionStats::default(), |a, b| a + b))
    }

    fn run_group(params: &Bam2Bed, group: &Bam2BedGroup, reader_threads: usize) -> Result<ConversionStats> {
        let mut writer: Box<dyn Write> = match &group.path_out {
            Some(p) => Box::new(BufWriter::new(
                File::create(p).with_context(|| format!("Could not create output file {:?}", p))?,
            )),
            None => Box::new(BufWriter::new(std::io::stdout())),
        };

        let mut stats = ConversionStats::default();
        for job in &group.jobs {
            log::info!("Converting {:?}", job.path_in);
            if !job.path_in.exists() {
                return Err(runtime::Error::file_not_found(&job.path_in).into());
            }

            let job_stats = match &job.region {
                Some(region) => {
                    let mut bam = bam::IndexedReader::from_path(&job.path_in)
                        .with_context(|| format!("Could not open indexed BAM {:?}", job.path_in))?;
                    bam.fetch(region.as_str())
                        .with_context(|| format!("Could not fetch region {} from {:?}", region, job.path_in))?;
                    convert_records(&mut bam, params, reader_threads, &mut writer)?
                }
                None => {
                    let mut bam = bam::Reader::from_path(&job.path_in)
                        .with_context(|| format!("Could not open BAM {:?}", job.path_in))?;
                    convert_records(&mut bam, params, reader_threads, &mut writer)?
                }
            };
            log::debug!("{:?}: {:?}", job.path_in, job_stats);
            stats = stats + job_stats;
        }
        writer.flush()?;
        Ok(stats)
    }
}

fn convert_records<R: Read, W: Write>(
    bam: &mut R,
    params: &Bam2Bed,
    reader_threads: usize,
    writer: &mut W,
) -> Result<ConversionStats> {
    //Activate multithreaded reading
    bam.set_threads(reader_threads)?;

    let header = bam.header();
    let chroms: Vec<String> = (0..header.target_count())
        .map(|tid| String::from_utf8_lossy(header.tid2name(tid)).into_owned())
        .collect();

    let mut stats = ConversionStats::default();
    let mut record = bam::Record::new();
    while let Some(r) = bam.read(&mut record) {
        r.context("Failed to read BAM record")?;

        //Only keep mapping reads
        if record.is_unmapped() {
            stats.unmapped += 1;
            continue;
        }

        let chrom = chroms
            .get(record.tid() as usize)
            .with_context(|| format!("Record refers to unknown reference id {}", record.tid()))?;

        match record_to_bed(&record, chrom, params.intron) {
            Ok(bed) => {
                bed.write(writer)?;
                stats.written += 1;
            }
            Err(e) => {
                let what = format!("read {}", String::from_utf8_lossy(record.qname()));
                handle_record_error(params.error_mode, &what, e)?;
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

///////////////////////////////
/// BED line for one mapped record. With an intron policy the CIGAR is projected into blocks.
///
/// A BAM CIGAR is already in reference order whatever strand the read is on, so it is
/// always projected forward; the read strand only goes into the strand column
pub fn record_to_bed(
    record: &bam::Record,
    chrom: &str,
    intron: Option<IntronPolicy>,
) -> Result<BedRecord, CigarError> {
    let cigar_view = record.cigar();
    let start = record.pos().max(0) as u64;
    let end = cigar_view.end_pos().max(0) as u64;

    let strand = if record.is_reverse() {
        Strand::Reverse
    } else {
        Strand::Forward
    };
    let name = String::from_utf8_lossy(record.qname());
    let bed = BedRecord::new(chrom, start, end, name, record.mapq() as u32, strand);

    match intron {
        Some(intron) => {
            let cigar = cigar_from_bam(&cigar_view)?;
            let blocks = cigar::project(&cigar, AlignmentSpan::new(start, end), Strand::Forward, intron)?;
            Ok(bed.with_blocks(blocks, DEFAULT_RGB))
        }
        None => Ok(bed),
    }
}

/// Convert htslib CIGAR operations without going through text. Only M, I and D
/// take part in blocks; anything else is an invalid operation
pub fn cigar_from_bam(ops: &[Cigar]) -> Result<CigarSequence, CigarError> {
    let text = || ops.iter().join("");
    ops.iter()
        .map(|op| {
            let kind = match op {
                Cigar::Match(_) => CigarOpKind::Match,
                Cigar::Ins(_) => CigarOpKind::Insertion,
                Cigar::Del(_) => CigarOpKind::Deletion,
                other => return Err(CigarError::invalid_operation(other.char().to_string(), text())),
            };
            if op.len() == 0 {
                return Err(CigarError::malformed(text(), Some("zero-length run")));
            }
            Ok(CigarOp::new(kind, op.len()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CigarSequence::new)
}
