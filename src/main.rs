use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process;
use tokio::signal;
use tracing::{error, info, warn};

use voter_lib::Responder;
use voter_lib::constants::{DEFAULT_HOST_PASSWORD, DEFAULT_PORT, DEFAULT_SERVER_CHALLENGE};
use voter_lib::transport::{bind, serve};
use voter_rs::logging::setup_logging;

/// Voter protocol analyzer and mock host.
///
/// Listens for voter frames, explains each digest against the known password
/// table and answers AUTH frames with a host-signed reply.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// UDP port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Host password used to sign AUTH replies.
    #[arg(long = "host-pwd", default_value = DEFAULT_HOST_PASSWORD)]
    host_pwd: String,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.as_deref(), &cli.verbose)?;

    if let Err(e) = run(cli).await {
        error!("Voter host failed: {:?}", e);
        process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let responder = Responder::new(cli.host_pwd.as_bytes(), DEFAULT_SERVER_CHALLENGE.as_bytes());

    let clients: Vec<&str> = responder
        .matcher()
        .passwords()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    info!("Host Password: '{}'", cli.host_pwd);
    info!("Server Challenge: '{}'", DEFAULT_SERVER_CHALLENGE);
    info!("Candidates: {:?}", clients);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, cli.port));
    let socket = bind(addr)
        .await
        .with_context(|| format!("Failed to acquire voter port {}", cli.port))?;

    serve(&socket, &responder, async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received, shutting down gracefully."),
            Err(e) => {
                warn!("Unable to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    })
    .await;

    Ok(())
}
