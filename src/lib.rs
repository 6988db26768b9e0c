//! Museum Accession Numbers
//!
//! Expansion of registrars' accession number shorthand, and the filename
//! conventions used when digitising the collection.

pub mod domain;
pub use domain::{CanonicalId, Config, ExpandError, Expander, expand};

/// Scan directories, scan filenames and board exports.
pub mod storage;
pub use storage::{SplitGrammar, SplitPlan, StitchGrammar, StitchPlan};
