use std::path::PathBuf;

use accession::{
    Config, SplitGrammar,
    storage::{Skip, SkipReason, plan_split},
};
use anyhow::Context;
use tracing::instrument;

use crate::cli::{
    stitch::{file_name, plural},
    terminal::Tone,
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The directory holding images to be split
    indir: PathBuf,

    /// The directory to contain the split images
    outdir: PathBuf,

    /// The character introducing the part digit, e.g. '#' for "JB001&2#1.jpg"
    ///
    /// Defaults to `flag_char` in the configuration file.
    #[arg(short, long, value_name = "CHAR")]
    flag_char: Option<char>,

    /// Plan images whose outputs already exist
    #[arg(long)]
    overwrite: bool,
}

impl Command {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let Some(flag_char) = self.flag_char.or(config.flag_char) else {
            anyhow::bail!("No flag character given; pass --flag-char or set flag_char in the config");
        };

        let grammar = SplitGrammar::new(flag_char, config.expander())
            .with_context(|| format!("invalid flag character '{flag_char}'"))?;
        let plan = plan_split(
            &self.indir,
            &self.outdir,
            &grammar,
            self.overwrite,
            config,
        )
        .with_context(|| format!("failed to scan {}", self.indir.display()))?;

        for job in &plan.jobs {
            println!(
                "{} → {}, {}",
                file_name(&job.input),
                job.outputs[0].display(),
                job.outputs[1].display()
            );
        }

        print_skipped(&plan.skipped);

        let count = plan.jobs.len();
        let summary = format!("{count} image{} ready to split", plural(count));
        println!("{}", Tone::Ready.paint(&summary));
        Ok(())
    }
}

pub(super) fn print_skipped(skipped: &[Skip]) {
    if skipped.is_empty() {
        return;
    }

    println!();
    for skip in skipped {
        let line = format!("Skipping {}: {}", file_name(&skip.path), skip.reason);
        let tone = match skip.reason {
            SkipReason::Unparsable(_) | SkipReason::Unpaired => {
                tracing::warn!("{line}");
                Tone::Trouble
            }
            SkipReason::NotAFile | SkipReason::NotAnImage => Tone::Aside,
            SkipReason::AlreadyProcessed => Tone::Quiet,
        };
        println!("{}", tone.paint(&line));
    }
    println!();
}
