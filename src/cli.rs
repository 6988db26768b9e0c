use std::path::{Path, PathBuf};

mod expand;
mod split;
mod stitch;
mod terminal;
mod trello;

use accession::Config;
use clap::ArgAction;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "accession.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(&self.config);
        self.command.run(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Expand accession number shorthand into full accession numbers
    ///
    /// Accepts ranges (JB021-24, SH21/4), '&' lists (JB001&2&3) and
    /// comma-separated combinations of these.
    Expand(expand::Command),

    /// Pair up two-pass scans (<accession number>A / B) for stitching
    Stitch(stitch::Command),

    /// Plan splitting of scans that show two objects
    ///
    /// Filenames are an accession list naming exactly two objects, followed
    /// by a flag character and a part digit, e.g. JB001&2#1.jpg.
    Split(split::Command),

    /// Export the cards of a Trello board to CSV
    Trello(trello::Command),
}

impl Command {
    fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Expand(command) => command.run(&config)?,
            Self::Stitch(command) => command.run(config)?,
            Self::Split(command) => command.run(&config)?,
            Self::Trello(command) => command.run()?,
        }
        Ok(())
    }
}

fn load_config(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load(path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using defaults");
        Config::default()
    })
}
