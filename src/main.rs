//! squitter - decode aircraft positions from a raw RTL-SDR IQ capture
//!
//! Reads interleaved unsigned 8-bit I/Q samples captured at 2 MSPS on
//! 1090 MHz, runs the Mode S / ADS-B pipeline and writes the resolved
//! position fixes as CSV, JSON or KML.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use squitter::output::{csv, json, kml, OutputFormat};
use squitter::{AltitudeQ0Policy, Decoder, DecoderConfig};

#[derive(Parser, Debug)]
#[command(name = "squitter", version)]
#[command(about = "Decode aircraft positions from a raw RTL-SDR IQ capture")]
struct Args {
    /// Raw IQ capture: interleaved unsigned 8-bit I/Q at 2 MSPS
    input: PathBuf,

    /// Output format: .csv, .json or .kml
    format: String,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace); diagnostics go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Preamble pulse threshold as a multiple of the mean magnitude
    #[arg(long, default_value_t = 5.0)]
    threshold_ratio: f64,

    /// Keep frames that fail the CRC-24 check (recall over precision)
    #[arg(long)]
    no_crc: bool,

    /// Decode Gillham-coded (Q=0) altitudes instead of skipping them
    #[arg(long)]
    gillham: bool,

    /// Maximum sample distance between paired even/odd CPR frames
    #[arg(long, default_value_t = 20_000_000)]
    staleness: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    log_setup(args.verbose);

    let Some(format) = OutputFormat::from_arg(&args.format) else {
        bail!("unknown output format {:?} (expected .csv, .json or .kml)", args.format);
    };

    let config = DecoderConfig {
        preamble_threshold_ratio: args.threshold_ratio,
        enforce_crc: !args.no_crc,
        altitude_q0_policy: if args.gillham {
            AltitudeQ0Policy::Gillham
        } else {
            AltitudeQ0Policy::Skip
        },
        cpr_staleness_samples: args.staleness,
    };

    let mut decoder = Decoder::new(config)?;

    let iq = fs::read(&args.input)
        .with_context(|| format!("unable to read capture {:?}", args.input))?;
    info!(
        "loaded {} bytes ({} samples) from {:?}",
        iq.len(),
        iq.len() / 2,
        args.input
    );

    let fixes = decoder.run(&iq);
    log_drop_counters(&decoder);

    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("unable to create output file {path:?}"))?;
            write_fixes(file, format, &fixes)?;
            info!("wrote {} fixes to {:?}", fixes.len(), path);
        }
        None => {
            let stdout = io::stdout();
            write_fixes(stdout.lock(), format, &fixes)?;
        }
    }

    Ok(())
}

fn write_fixes<W: Write>(writer: W, format: OutputFormat, fixes: &[squitter::PositionFix]) -> Result<()> {
    match format {
        OutputFormat::Csv => csv::write_csv(writer, fixes),
        OutputFormat::Json => json::write_json(writer, fixes),
        OutputFormat::Kml => kml::write_kml(writer, fixes),
    }
}

fn log_setup(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Diagnostics stay on stderr so piped stdout output remains clean.
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn log_drop_counters(decoder: &Decoder) {
    let stats = &decoder.stats;
    info!(
        "drops: {} ambiguous, {} crc, {} non-df17, {} tc, {} nl-mismatch, {} stale, {} out-of-range",
        stats.ambiguous_bits,
        stats.crc_failures,
        stats.non_df17,
        stats.tc_out_of_range,
        stats.nl_mismatches,
        stats.stale_pairs,
        stats.out_of_range,
    );
}
