//! lanflux - router device usage forwarder binary
//!
//! Fetches the router's device list and writes it to InfluxDB, once or on an
//! interval.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures_util::StreamExt;
use lanflux::devices::source::DEFAULT_SOURCE_PROGRAM;
use lanflux::{
    preview, CommandSource, DeviceRecord, DeviceSource, FileSource, Forwarder, InfluxConfig,
    InfluxWriter, RunReport, DEFAULT_INTERVAL_SECS,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, Level, Subscriber};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "lanflux")]
#[command(about = "Forward router device usage to InfluxDB")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Fetches the router's device list, encodes one line protocol point per device \
                  and writes the batch to an InfluxDB v2 bucket.\n\n\
                  The write endpoint is read from the URL, ORG, BUCKET and TOKEN environment \
                  variables (a .env file is loaded if present)."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Program that prints the device list as a JSON array [default: python3.8 sample.py devices]
    #[arg(long)]
    source_cmd: Option<String>,

    /// Argument passed to the source program (repeatable)
    #[arg(long = "source-arg", allow_hyphen_values = true)]
    source_args: Vec<String>,

    /// Read the device list from a JSON file instead of running a program
    #[arg(long, conflicts_with_all = ["source_cmd", "source_args"])]
    from_file: Option<PathBuf>,

    /// Skip devices with unusable records instead of failing the run
    #[arg(long)]
    skip_malformed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward a single snapshot and exit (default)
    Once(OnceArgs),

    /// Forward a snapshot every interval until interrupted
    Watch(WatchArgs),

    /// Print the line protocol for the current snapshot without writing it
    Preview,
}

#[derive(Args)]
struct OnceArgs {
    /// Report output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Pretty)]
    format: ReportFormat,
}

#[derive(Args)]
struct WatchArgs {
    /// Seconds between runs
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum ReportFormat {
    Pretty,
    Json,
}

/// The device source picked on the command line.
enum CliSource {
    Command(CommandSource),
    File(FileSource),
}

impl CliSource {
    fn from_cli(cli: &Cli) -> Self {
        if let Some(path) = &cli.from_file {
            return CliSource::File(FileSource::new(path));
        }

        match (&cli.source_cmd, cli.source_args.is_empty()) {
            (None, true) => CliSource::Command(CommandSource::default()),
            (None, false) => CliSource::Command(CommandSource::new(
                DEFAULT_SOURCE_PROGRAM,
                cli.source_args.clone(),
            )),
            (Some(program), _) => {
                CliSource::Command(CommandSource::new(program.clone(), cli.source_args.clone()))
            }
        }
    }
}

impl DeviceSource for CliSource {
    async fn fetch_devices(&self) -> lanflux::Result<Vec<DeviceRecord>> {
        match self {
            CliSource::Command(source) => source.fetch_devices().await,
            CliSource::File(source) => source.fetch_devices().await,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(err).context("failed to load .env file"),
    }

    let source = CliSource::from_cli(&cli);

    match &cli.command {
        Some(Commands::Once(args)) => once_command(&cli, source, args.format).await,
        Some(Commands::Watch(args)) => watch_command(&cli, source, args).await,
        Some(Commands::Preview) => preview_command(&cli, source).await,
        None => once_command(&cli, source, ReportFormat::Pretty).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing::subscriber::set_global_default(build_subscriber(level, directives.as_deref()))?;

    Ok(())
}

/// Log to stderr at `level`, unless `RUST_LOG`-style directives say otherwise.
fn build_subscriber(
    level: Level,
    directives: Option<&str>,
) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default());

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
}

fn build_forwarder(cli: &Cli, source: CliSource) -> anyhow::Result<Forwarder<CliSource>> {
    let config = InfluxConfig::from_env().context("InfluxDB settings are incomplete")?;
    let writer = InfluxWriter::new(config)?.with_skip_malformed(cli.skip_malformed);

    let config = writer.config();
    info!(url = %config.write_url(), org = %config.org, bucket = %config.bucket, "Writing to InfluxDB");

    Ok(Forwarder::new(source, writer))
}

async fn once_command(cli: &Cli, source: CliSource, format: ReportFormat) -> anyhow::Result<()> {
    let forwarder = build_forwarder(cli, source)?;
    let report = forwarder.run_once().await.context("forwarding run failed")?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Pretty => print_pretty_report(&report),
    }

    Ok(())
}

async fn watch_command(cli: &Cli, source: CliSource, args: &WatchArgs) -> anyhow::Result<()> {
    let forwarder = build_forwarder(cli, source)?;
    info!(interval_secs = args.interval, "Starting periodic forwarding");

    let mut runs = forwarder.start_stream(Duration::from_secs(args.interval));
    loop {
        tokio::select! {
            item = runs.next() => match item {
                Some(Ok(report)) => debug!(run_id = %report.run_id, bytes = report.bytes, "Run finished"),
                Some(Err(err)) => error!(error = %err, "Forwarding run failed"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    Ok(())
}

async fn preview_command(cli: &Cli, source: CliSource) -> anyhow::Result<()> {
    let batch = preview(&source, cli.skip_malformed)
        .await
        .context("failed to build preview")?;

    for line in batch.iter_lines() {
        println!("{}", line);
    }
    if batch.skipped > 0 {
        eprintln!("{} device(s) skipped", batch.skipped);
    }

    Ok(())
}

fn print_pretty_report(report: &RunReport) {
    println!(
        "Run {} ({})",
        report.run_id,
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Devices: {}", report.devices);
    println!("  Lines written: {}", report.lines);
    if report.skipped > 0 {
        println!("  Skipped: {}", report.skipped);
    }
    println!("  Payload: {} bytes", report.bytes);
}
