pub mod directory;
pub mod scan_name;
/// Trello board export to CSV.
pub mod trello;

pub use directory::{
    ScanError, Skip, SkipReason, SplitJob, SplitPlan, StitchJob, StitchPlan, plan_split,
    plan_stitch,
};
pub use scan_name::{Half, ParseError, SplitGrammar, SplitName, StitchGrammar, StitchName};
pub use trello::{Board, Card, ExportError};
