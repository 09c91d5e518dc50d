//! Salary-band propagation.
//!
//! Each job family holds a forest of bands linked by `parentId` (the level
//! below). Manual bands are anchors; auto-calculated bands are derived from
//! their neighbors so that adjacent levels stay contiguous. When anchors
//! disagree, the leading band wins.

pub mod bands;
pub mod family;
pub mod sync;

pub use bands::{
    DEFAULT_MIDPOINT, DEFAULT_SPREAD, SalaryBand, SubBand, SubBandName, next_midpoint,
    previous_midpoint, sub_bands,
};
pub use family::{BandEdit, JobFamily, add_family, find_family, remove_family, replace_family};
pub use sync::perform_sync;

/// Reasons a salary edit is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SalaryError {
    #[error("unknown job family: {0}")]
    UnknownFamily(String),
    #[error("job family already exists: {0}")]
    DuplicateFamily(String),
    #[error("unknown salary band: {0}")]
    UnknownBand(String),
    #[error("salary band already exists: {0}")]
    DuplicateBand(String),
    #[error("auto-calculated band {0} cannot lead")]
    AutoBandCannotLead(String),
}
