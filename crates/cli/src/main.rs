use crate::{error::CliError, fixture::ScanFixture};
use clap::Parser;
use commands::Commands;
use connectors::kudu::{KuduReaderIterator, KuduScanner, ReaderConfig, ReaderStats};
use std::io::{BufWriter, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod fixture;
mod output;

#[derive(Parser)]
#[command(
    name = "kudu-rows",
    version = "0.1.0",
    about = "Replay Kudu scan pages as rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays pure JSON lines.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dump {
            input,
            config,
            limit,
        } => dump(&input, config.as_deref(), limit)?,
    }

    Ok(())
}

fn dump(input: &str, config: Option<&str>, limit: Option<usize>) -> Result<(), CliError> {
    let config = match config {
        Some(path) => ReaderConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ReaderConfig::default(),
    };
    info!("Reading scan fixture {} with {:?}", input, config);

    let fixture = ScanFixture::from_json(&std::fs::read_to_string(input)?)?;
    let scanner = fixture.into_scanner()?;
    let mut reader = KuduReaderIterator::with_config(scanner, &config)?;

    let stdout = std::io::stdout();
    let stats = write_rows(&mut reader, limit, &mut BufWriter::new(stdout.lock()))?;
    info!(
        "Dumped {} rows from {} pages",
        stats.rows_returned, stats.pages_fetched
    );
    Ok(())
}

/// Writes up to `limit` rows as JSON lines, then closes the reader even
/// when rows are left on the server.
fn write_rows<S: KuduScanner, W: Write>(
    reader: &mut KuduReaderIterator<S>,
    limit: Option<usize>,
    out: &mut W,
) -> Result<ReaderStats, CliError> {
    for row in reader.by_ref().take(limit.unwrap_or(usize::MAX)) {
        output::write_row(out, &row?)?;
    }
    out.flush()?;

    reader.close()?;
    Ok(reader.stats())
}
