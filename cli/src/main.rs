use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use parejita_core::Difficulty;
use tracing_subscriber::EnvFilter;

mod play;

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum DifficultyArg {
    /// 8 pairs
    Easy,
    /// 12 pairs
    Medium,
    /// 16 pairs
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Memory-matching card game in the terminal.
#[derive(Debug, Parser)]
#[command(name = "parejita", version, about)]
struct Cli {
    /// Board size of the first deal
    #[arg(long, value_enum, default_value = "easy")]
    difficulty: DifficultyArg,

    /// Seed for a reproducible first deal; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Deal partners adjacent instead of shuffling (practice mode)
    #[arg(long)]
    ordered: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.verbosity.log_level_filter().to_string())),
        )
        .init();

    play::run(cli.difficulty.into(), cli.seed, cli.ordered)
}
