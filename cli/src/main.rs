mod io;
mod plot;
mod sample;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "downsample",
    about = "Shape-preserving downsampling of large point series with LTTB and LTD"
)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[clap(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Downsample a point series
    Sample(sample::Opts),
    /// Generate an HTML plot comparing the raw series with its LTTB and LTD reductions
    Plot(plot::Opts),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Sample(opts) => sample::sample(&opts).await,
        Command::Plot(opts) => plot::plot(&opts).await,
    }
}
