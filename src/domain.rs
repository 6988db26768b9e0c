//! Domain models for accession number handling.
//!
//! This module contains the accession number grammar and expansion, and the
//! configuration shared by the scan tools.

/// Accession number shorthand: parsing and expansion.
pub mod accession;
pub use accession::{CanonicalId, Error as ExpandError, Expander, expand};

mod config;
pub use config::Config;
