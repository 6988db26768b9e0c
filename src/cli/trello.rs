use std::{fs, io::BufWriter, path::PathBuf};

use accession::storage::Board;
use anyhow::Context;
use tracing::instrument;

use crate::cli::terminal::Tone;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The board export in JSON format
    infile: PathBuf,

    /// The CSV file to write
    outfile: PathBuf,

    /// Start the CSV with a UTF-8 byte order mark
    #[arg(long)]
    bom: bool,
}

impl Command {
    #[instrument(level = "debug")]
    pub fn run(self) -> anyhow::Result<()> {
        let json = fs::read_to_string(&self.infile)
            .with_context(|| format!("failed to read {}", self.infile.display()))?;
        let board = Board::from_json(&json)
            .with_context(|| format!("failed to parse {}", self.infile.display()))?;

        let file = fs::File::create(&self.outfile)
            .with_context(|| format!("failed to create {}", self.outfile.display()))?;
        let rows = board
            .write_csv(BufWriter::new(file), self.bom)
            .with_context(|| format!("failed to write {}", self.outfile.display()))?;

        tracing::info!("Exported {rows} cards to {}", self.outfile.display());
        println!("{}", Tone::Ready.paint(&format!("Number of cards: {rows}")));
        Ok(())
    }
}
