use std::path::PathBuf;

use accession::{Config, StitchGrammar, storage::plan_stitch};
use anyhow::Context;
use tracing::instrument;

use crate::cli::{split::print_skipped, terminal::Tone};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The directory holding the scanned halves
    indir: PathBuf,

    /// The directory to contain the stitched images
    outdir: PathBuf,

    /// The MDA code that prepends some accession numbers
    #[arg(short, long, value_name = "CODE")]
    mda_code: Option<String>,
}

impl Command {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, mut config: Config) -> anyhow::Result<()> {
        if let Some(code) = self.mda_code {
            config.set_mda_code(code);
        }

        let grammar = StitchGrammar::new(config.mda_code())
            .with_context(|| format!("invalid MDA code '{}'", config.mda_code()))?;
        let plan = plan_stitch(&self.indir, &self.outdir, &grammar, &config)
            .with_context(|| format!("failed to scan {}", self.indir.display()))?;

        for job in &plan.jobs {
            println!(
                "{} + {} → {}",
                file_name(&job.inputs[0]),
                file_name(&job.inputs[1]),
                job.output.display()
            );
        }

        print_skipped(&plan.skipped);

        let count = plan.jobs.len();
        let summary = format!("{count} pair{} ready to stitch", plural(count));
        println!("{}", Tone::Ready.paint(&summary));
        Ok(())
    }
}

pub(super) fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().to_string())
}

pub(super) const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
