//! Export of Trello board cards to CSV
//!
//! The catalogue team tracks objects on a Trello board. A board export is a
//! JSON document with a `cards` array; only each card's `name` and `desc`
//! are kept, one CSV row per card.

use std::io::{self, Write};

use serde::Deserialize;

/// The parts of a Trello board export that are exported.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Board {
    /// The cards on the board, in export order.
    pub cards: Vec<Card>,
}

/// A single Trello card.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Card {
    /// The card title.
    pub name: String,
    /// The card description.
    #[serde(default)]
    pub desc: String,
}

impl Board {
    /// Parses a board export.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not JSON or has no `cards` array.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes one `name,desc` row per card, returning the number of rows.
    ///
    /// Carriage returns at either end of a field are stripped and line breaks
    /// inside it become spaces. Fields are quoted only where needed. With
    /// `bom` set, a UTF-8 byte order mark is written first so spreadsheet
    /// software picks the right encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, mut writer: W, bom: bool) -> Result<usize, ExportError> {
        if bom {
            writer.write_all("\u{feff}".as_bytes())?;
        }
        let mut csv = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        for card in &self.cards {
            csv.write_record([flatten(&card.name), flatten(&card.desc)])?;
        }
        csv.flush()?;
        Ok(self.cards.len())
    }
}

/// Errors that can occur while exporting a board
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The board export could not be parsed.
    #[error("invalid board export: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV record could not be written.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The output could not be written.
    #[error("failed to write CSV: {0}")]
    Io(#[from] io::Error),
}

fn flatten(field: &str) -> String {
    field.trim_matches('\r').replace("\r\n", " ").replace('\n', " ")
}
