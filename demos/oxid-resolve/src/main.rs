//! IOXIDResolver: list the network interfaces a host advertises to DCOM
//!
//! Run with: cargo run --bin oxid-resolve -- --target 192.168.1.1

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxid_resolver::{resolve_interfaces_with, ResolverConfig};

#[derive(Parser)]
#[command(name = "oxid-resolve")]
#[command(about = "IOXIDResolver: A tool to resolve IOXID")]
struct Args {
    /// Target IP address or host name, optionally with :port
    #[arg(short, long, default_value = "192.168.1.1")]
    target: String,

    /// Port used when the target names none
    #[arg(short, long, default_value = "135")]
    port: u16,

    /// Overall timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// TCP connect timeout in seconds
    #[arg(long, default_value = "10")]
    connect_timeout: u64,

    /// Log protocol milestones
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ResolverConfig::new()
        .with_port(args.port)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout));

    match resolve_interfaces_with(&args.target, &config).await {
        Ok(bindings) => {
            info!("Retrieving network interface of {}", args.target);
            for binding in bindings {
                info!("Address: {}", binding.address);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("An error occurred: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
