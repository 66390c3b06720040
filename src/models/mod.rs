//! Data types passed between the workflow stages.
//!
//! # Lifecycle
//!
//! - [`CandidateFile`]: a located file and its value at staging time.
//!   Discarded once the draft is rendered.
//! - [`Manifest`]: the staged file set plus the draft description. Only
//!   ever materialised as draft document text.
//! - [`ParseResult`]: what the user left in the draft after editing.
//! - [`ReconciliationOutcome`]: per-file result of the write pass.

mod candidate;
mod outcome;
mod parse_result;

pub use candidate::*;
pub use outcome::*;
pub use parse_result::*;
