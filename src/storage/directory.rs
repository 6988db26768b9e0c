//! Planning work over a directory of scans
//!
//! The scan tools read one flat input directory and write to an output
//! directory. Planning pairs up or splits filenames according to the
//! grammars in [`scan_name`](super::scan_name) and records every file it
//! passes over, so a run can be reviewed before any image is touched.
//! The image operations themselves are carried out elsewhere.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use walkdir::WalkDir;

use crate::{
    domain::Config,
    storage::scan_name::{Half, SplitGrammar, StitchGrammar},
};

/// Why a file was left out of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is a directory or other non-file.
    NotAFile,
    /// The extension is not a configured image extension.
    NotAnImage,
    /// The name does not follow the expected convention.
    Unparsable(String),
    /// Only one half of a two-pass scan was found.
    Unpaired,
    /// The output already exists and overwriting is off.
    AlreadyProcessed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAFile => write!(f, "not a file"),
            Self::NotAnImage => write!(f, "not an image"),
            Self::Unparsable(reason) => write!(f, "failed parse: {reason}"),
            Self::Unpaired => write!(f, "only one half found"),
            Self::AlreadyProcessed => write!(f, "already processed"),
        }
    }
}

/// A file left out of a plan, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    /// The file that was skipped (for [`SkipReason::AlreadyProcessed`], the
    /// existing output).
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Two halves to be stitched into one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchJob {
    /// The A half, then the B half.
    pub inputs: [PathBuf; 2],
    /// Where the stitched image goes.
    pub output: PathBuf,
}

/// The stitch work found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StitchPlan {
    /// Jobs, ordered by output filename.
    pub jobs: Vec<StitchJob>,
    /// Files left out.
    pub skipped: Vec<Skip>,
}

/// One image to be split into two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitJob {
    /// The image holding both objects.
    pub input: PathBuf,
    /// Where each object's image goes, in the order the name lists them.
    pub outputs: [PathBuf; 2],
}

/// The split work found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitPlan {
    /// Jobs, ordered by input filename.
    pub jobs: Vec<SplitJob>,
    /// Files left out.
    pub skipped: Vec<Skip>,
}

/// Errors that can occur while reading the input directory
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The input path is not a directory.
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    /// The directory could not be listed.
    #[error("failed to read input directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// An image file whose name is yet to be parsed.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    stem: String,
    extension: String,
}

/// Plans stitching for every two-pass scan in `indir`.
///
/// Files are grouped by their stitched name, `<base><extension>`. A group
/// becomes a job only when it holds exactly one A half and one B half.
///
/// # Errors
///
/// Returns an error if `indir` is not a readable directory.
pub fn plan_stitch(
    indir: &Path,
    outdir: &Path,
    grammar: &StitchGrammar,
    config: &Config,
) -> Result<StitchPlan, ScanError> {
    let (candidates, mut skipped) = list_images(indir, config)?;

    let parsed: Vec<_> = candidates
        .into_par_iter()
        .map(|candidate| {
            let name = grammar.parse(&candidate.stem);
            (candidate, name)
        })
        .collect();

    let mut groups: BTreeMap<String, Vec<(Half, PathBuf)>> = BTreeMap::new();
    for (candidate, name) in parsed {
        match name {
            Ok(name) => {
                let outfile = format!("{}{}", name.base, candidate.extension);
                tracing::debug!(
                    "{}: base={}, half={:?}",
                    candidate.path.display(),
                    name.base,
                    name.half
                );
                groups
                    .entry(outfile)
                    .or_default()
                    .push((name.half, candidate.path));
            }
            Err(e) => skipped.push(skip(candidate.path, SkipReason::Unparsable(e.to_string()))),
        }
    }

    let mut jobs = Vec::with_capacity(groups.len());
    for (outfile, mut halves) in groups {
        halves.sort_by_key(|(half, _)| *half);
        match <[_; 2]>::try_from(halves) {
            Ok([(Half::A, a), (Half::B, b)]) => jobs.push(StitchJob {
                inputs: [a, b],
                output: outdir.join(outfile),
            }),
            Ok(halves) => skipped.extend(
                halves
                    .into_iter()
                    .map(|(_, path)| skip(path, SkipReason::Unpaired)),
            ),
            Err(halves) => skipped.extend(
                halves
                    .into_iter()
                    .map(|(_, path)| skip(path, SkipReason::Unpaired)),
            ),
        }
    }

    tracing::info!(
        "Planned {} stitch jobs, skipped {} files",
        jobs.len(),
        skipped.len()
    );
    Ok(StitchPlan { jobs, skipped })
}

/// Plans splitting for every flagged-part scan in `indir`.
///
/// Unless `overwrite` is set, outputs that already exist are reported as
/// skipped, and an input whose outputs both exist is not planned.
///
/// # Errors
///
/// Returns an error if `indir` is not a readable directory.
pub fn plan_split(
    indir: &Path,
    outdir: &Path,
    grammar: &SplitGrammar,
    overwrite: bool,
    config: &Config,
) -> Result<SplitPlan, ScanError> {
    let (candidates, mut skipped) = list_images(indir, config)?;

    let parsed: Vec<_> = candidates
        .into_par_iter()
        .map(|candidate| {
            let name = grammar.parse(&candidate.stem);
            (candidate, name)
        })
        .collect();

    let mut jobs = Vec::new();
    for (candidate, name) in parsed {
        let name = match name {
            Ok(name) => name,
            Err(e) => {
                skipped.push(skip(candidate.path, SkipReason::Unparsable(e.to_string())));
                continue;
            }
        };

        let outputs = name
            .targets
            .map(|target| outdir.join(format!("{target}{}", candidate.extension)));
        tracing::debug!(
            "{}: outputs={:?}",
            candidate.path.display(),
            outputs
        );

        let existing: Vec<_> = if overwrite {
            Vec::new()
        } else {
            outputs.iter().filter(|path| path.exists()).cloned().collect()
        };
        let all_exist = existing.len() == outputs.len();
        skipped.extend(
            existing
                .into_iter()
                .map(|path| skip(path, SkipReason::AlreadyProcessed)),
        );

        if !all_exist {
            jobs.push(SplitJob {
                input: candidate.path,
                outputs,
            });
        }
    }

    tracing::info!(
        "Planned {} split jobs, skipped {} files",
        jobs.len(),
        skipped.len()
    );
    Ok(SplitPlan { jobs, skipped })
}

/// Lists the immediate children of `indir` in filename order, separating
/// image files from everything else.
fn list_images(indir: &Path, config: &Config) -> Result<(Vec<Candidate>, Vec<Skip>), ScanError> {
    if !indir.is_dir() {
        return Err(ScanError::NotADirectory(indir.to_path_buf()));
    }

    let mut candidates = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(indir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.into_path();

        if !path.is_file() {
            skipped.push(skip(path, SkipReason::NotAFile));
            continue;
        }

        let (Some(stem), Some(extension)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            skipped.push(skip(path, SkipReason::NotAnImage));
            continue;
        };

        if !config.is_image_extension(extension) {
            skipped.push(skip(path, SkipReason::NotAnImage));
            continue;
        }

        candidates.push(Candidate {
            stem: stem.to_string(),
            extension: format!(".{extension}"),
            path,
        });
    }

    Ok((candidates, skipped))
}

fn skip(path: PathBuf, reason: SkipReason) -> Skip {
    tracing::debug!("Skipping {}: {reason}", path.display());
    Skip { path, reason }
}
