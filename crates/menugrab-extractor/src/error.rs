//! Extraction error taxonomy.
//!
//! Only run-fatal kinds live here. Item-level failures (a tile without a
//! name, an overlay that never opens, a malformed option group) are absorbed
//! inside the engine and degrade the affected record, not the run.

use thiserror::Error;

use crate::page::PageError;

/// Fatal extraction errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The target page never reached a loadable state.
    #[error("page never reached a loadable state at {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Scroll-driven content never stopped growing within the bound.
    #[error("scrollable extent still growing after {rounds} scroll rounds")]
    StabilizationTimeout { rounds: u32 },

    /// Transport failure outside any item-level recovery scope.
    #[error(transparent)]
    Page(#[from] PageError),
}
