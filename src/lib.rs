//! Batch-edit one metadata field across a set of files using a
//! commit-message style draft opened in the user's editor.

pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod locator;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod workflow;

pub use config::Config;
pub use error::{CommitError, StoreError};
pub use workflow::Workflow;
