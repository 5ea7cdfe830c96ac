use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::process;
use tracing::{info, warn};

use voter_lib::constants::{DEFAULT_HOST_PASSWORD, DEFAULT_SERVER_CHALLENGE};
use voter_lib::cracker::crack;
use voter_lib::matcher::{ForensicMatcher, known_clients};
use voter_lib::responder::reference_line;
use voter_lib::text::ChallengeText;
use voter_rs::args::{parse_candidate, parse_challenge, parse_digest, parse_extra_challenge};
use voter_rs::logging::setup_logging;

/// Offline search for the hypothesis behind one observed digest.
///
/// Lists every collision, for the digest as logged and with its bytes
/// swapped, in case the device wrote it in the wrong byte order.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Observed digest in hex (e.g. FCCA02CA).
    digest: String,
    /// Client challenge as text.
    #[arg(short, long, conflicts_with = "challenge_hex")]
    challenge: Option<String>,
    /// Client challenge as a hex dump of the raw 10-byte field.
    #[arg(long)]
    challenge_hex: Option<String>,
    /// Host password candidate.
    #[arg(long = "host-pwd", default_value = DEFAULT_HOST_PASSWORD)]
    host_pwd: String,
    /// Server challenge the device was answering.
    #[arg(long, default_value = DEFAULT_SERVER_CHALLENGE)]
    server_challenge: String,
    /// Extra password hypothesis as NAME=PASSWORD; repeatable.
    #[arg(short = 'P', long = "password")]
    passwords: Vec<String>,
    /// Extra challenge hypothesis as NAME=TEXT or NAME=hex:DIGITS; repeatable.
    #[arg(short = 'C', long = "extra-challenge")]
    extra_challenges: Vec<String>,
    /// Also try case and whitespace variants of every password.
    #[arg(long)]
    variants: bool,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(None, &cli.verbose)?;

    let target = parse_digest(&cli.digest)?;
    let challenge = parse_challenge(cli.challenge.as_deref(), cli.challenge_hex.as_deref())
        .context("Failed to read client challenge")?;

    let mut clients = known_clients();
    for candidate in &cli.passwords {
        clients.push(parse_candidate(candidate)?);
    }
    let extras = cli
        .extra_challenges
        .iter()
        .map(|c| parse_extra_challenge(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut matcher = ForensicMatcher::new(clients, cli.host_pwd.as_bytes(), cli.server_challenge.as_bytes())
        .with_extra_challenges(extras);
    if cli.variants {
        matcher = matcher.with_password_variants();
    }

    info!("--- Cracking {:08X} ---", target);
    info!("Client Challenge: {}", ChallengeText::decode(&challenge));

    info!(
        "Searching {} passwords x {} challenges",
        matcher.passwords().len(),
        matcher.challenges(&challenge).len()
    );

    let hits = crack(&matcher, target, &challenge);
    for hit in &hits {
        info!("[!] MATCH {}", hit);
    }

    if hits.is_empty() {
        warn!("No hypothesis reproduces {:08X}", target);
        for (label, expected) in matcher.reference_digests(&challenge) {
            info!("    {}", reference_line(label, expected));
        }
        process::exit(1);
    }

    info!("--- Done: {} match(es) ---", hits.len());
    Ok(())
}
