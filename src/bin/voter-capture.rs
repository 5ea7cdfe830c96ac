use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

use voter_lib::capture::read_capture;
use voter_lib::constants::DEFAULT_PORT;
use voter_rs::logging::setup_logging;

/// Per-source challenge distribution from a voter traffic capture.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// pcap or pcapng file to analyze.
    input: PathBuf,
    /// Voter UDP port to filter on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(None, &cli.verbose)?;

    info!("Analyzing {:?}...", cli.input);
    let file = File::open(&cli.input).with_context(|| format!("Failed to open capture {:?}", cli.input))?;
    let stats = read_capture(file, cli.port).with_context(|| format!("Failed to read capture {:?}", cli.input))?;

    info!("Total Packets Scanned: {}", stats.packets_scanned());
    info!("--- Challenge ID Distribution per Source IP ---");
    if stats.sources().is_empty() {
        info!("No UDP packets found on port {}.", stats.port());
        return Ok(());
    }
    for source in stats.sources() {
        info!("Source IP: {}", source.source);
        for (challenge, count) in &source.challenges {
            info!("  - Challenge: {} | Count: {}", challenge, count);
        }
    }

    Ok(())
}
