use accession::Config;
use anyhow::Context;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Accession lists to expand, e.g. "JB021-24" or "LDHRM.2023.1&2,SH4"
    #[arg(required = true, value_name = "LIST")]
    lists: Vec<String>,

    /// Print a JSON array instead of one accession number per line
    #[arg(long)]
    json: bool,

    /// Maximum number of accession numbers a single range may produce
    #[arg(long, value_name = "COUNT")]
    max_span: Option<usize>,
}

impl Command {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let expander = self
            .max_span
            .map_or_else(|| config.expander(), accession::Expander::with_max_span);

        let mut ids = Vec::new();
        for list in &self.lists {
            let expanded = expander
                .expand(list)
                .with_context(|| format!("invalid accession list '{list}'"))?;
            tracing::debug!("'{list}' expanded to {} accession numbers", expanded.len());
            ids.extend(expanded.into_iter().map(String::from));
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ids)?);
        } else {
            for id in ids {
                println!("{id}");
            }
        }

        Ok(())
    }
}
