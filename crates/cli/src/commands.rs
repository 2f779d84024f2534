use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded scan and print every decoded row as a JSON array
    Dump {
        #[arg(long, help = "Scan fixture file path")]
        input: String,

        #[arg(long, help = "Reader config file path (JSON)")]
        config: Option<String>,

        #[arg(
            long,
            help = "Stop after this many rows; the scanner is closed early"
        )]
        limit: Option<usize>,
    },
}
