use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use chromint::text::{peak_table_to_file, peak_table_to_writer, signal_from_reader, DEFAULT_DELIMITER};
use chromint::{integrate_peaks, IntegrationConfig, Interval, QuadratureMethod};

/// Detect, bound and integrate the peaks of one channel of a chromatogram table
#[derive(Debug, Parser)]
#[command(name = "chromint", version, about)]
struct Cli {
    /// The delimited chromatogram table to read
    path: PathBuf,

    /// The header name of the intensity column
    #[arg(long, short = 'c')]
    channel: String,

    /// A `start:end` window to search for peaks in, may be repeated
    #[arg(long = "interval", short = 'i', value_parser = parse_interval, required = true)]
    intervals: Vec<Interval>,

    /// The column separator of the table
    #[arg(long, short = 'd', default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// The minimum height of a detected peak
    #[arg(long, default_value_t = 4000.0)]
    min_height: f32,

    /// The minimum vertical distance between a peak and both its neighbors
    #[arg(long, default_value_t = 1.0)]
    threshold: f32,

    /// The minimum number of samples between two detected peaks
    #[arg(long, default_value_t = 2)]
    min_separation: usize,

    /// The absolute slope below which a peak's edge is reached
    #[arg(long, default_value_t = 5.0)]
    min_slope: f32,

    /// The number of samples next to the apex skipped by the edge search
    #[arg(long, default_value_t = 5)]
    edge_margin: usize,

    /// The quadrature rule, `simpson` or `trapezoid`
    #[arg(long, short = 'm', default_value_t = QuadratureMethod::Simpson)]
    method: QuadratureMethod,

    /// Write the peak table here instead of to stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> IntegrationConfig {
        IntegrationConfig::default()
            .min_height(self.min_height)
            .threshold(self.threshold)
            .min_separation(self.min_separation)
            .min_slope(self.min_slope)
            .edge_margin(self.edge_margin)
            .method(self.method)
    }
}

fn parse_interval(text: &str) -> Result<Interval, String> {
    let (start, end) = text
        .split_once(':')
        .ok_or_else(|| format!("expected start:end, got {text:?}"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid interval start {start:?}: {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid interval end {end:?}: {e}"))?;
    Interval::new(start, end).map_err(|e| e.to_string())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    let signal = signal_from_reader(fs::File::open(&cli.path)?, &cli.channel, cli.delimiter)?;
    eprintln!(
        "Read {} points from {} channel {}",
        signal.len(),
        cli.path.display(),
        cli.channel
    );

    let start = Instant::now();
    let result = integrate_peaks(&signal, &cli.intervals, &config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    eprintln!(
        "Integrated {} peaks in {} microseconds",
        result.integrated_peaks().count(),
        (Instant::now() - start).as_micros()
    );
    for (iv, peak) in result.excluded_peaks() {
        eprintln!("\tExcluded {peak} in {iv}");
    }

    match &cli.output {
        Some(path) => peak_table_to_file(&result, path),
        None => peak_table_to_writer(&result, &mut io::stdout().lock()),
    }
}
