use clap::{Args, ValueEnum};
use eyre::Result;
use tracing::info;

use downsampling::{lttb, lttb_buckets, Format, Ltd};

use crate::io::{read_points, write_points, XY};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Largest Triangle Dynamic
    Ltd,
    /// Largest Triangle Three Buckets
    Lttb,
    /// LTTB over a materialized equal-width bucket list
    LttbBuckets,
}

#[derive(Args, Debug)]
pub struct Opts {
    /// Downsampling algorithm
    #[clap(long, value_enum, default_value = "ltd")]
    pub algorithm: Algorithm,

    /// Number of points to keep [0 = keep everything]
    #[clap(long, env = "DOWNSAMPLE_THRESHOLD")]
    pub threshold: usize,

    /// LTD optimizer budget multiplier (iterations = points * factor / threshold)
    #[clap(long, env = "DOWNSAMPLE_ITERATION_FACTOR", default_value_t = 10)]
    pub iteration_factor: usize,

    /// Output encoding (csv, json) [default: input encoding]
    #[clap(long)]
    pub to: Option<String>,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    pub output: String,

    /// Input files [default: stdin]
    pub files: Vec<String>,
}

pub fn run(algorithm: Algorithm, ltd: &Ltd, points: &[XY], threshold: usize) -> Result<Vec<XY>> {
    let sampled = match algorithm {
        Algorithm::Ltd => ltd.downsample(points, threshold)?,
        Algorithm::Lttb => lttb(points, threshold)?,
        Algorithm::LttbBuckets => lttb_buckets(points, threshold)?,
    };
    Ok(sampled)
}

pub async fn sample(opts: &Opts) -> Result<()> {
    let (points, input_format) = read_points(&opts.files).await?;
    if points.is_empty() {
        eyre::bail!("no points to downsample");
    }

    let format = match &opts.to {
        Some(to) => to.parse()?,
        None => input_format.unwrap_or(Format::Csv),
    };

    let ltd = Ltd::default().with_iteration_factor(opts.iteration_factor);
    let sampled = run(opts.algorithm, &ltd, &points, opts.threshold)?;
    info!(
        algorithm = ?opts.algorithm,
        input = points.len(),
        output = sampled.len(),
        "downsampled series"
    );

    write_points(&opts.output, format, &sampled).await
}
