//! Parsed files and tree traversal.
//!
//! - [`ParsedFile`] owns a tree together with its text, uri and provenance
//! - [`visitor`] walks trees lazily with an explicit skip-subtree signal

pub mod file;
pub mod visitor;

pub use file::{ParsedFile, Provenance};
pub use visitor::{VisitAction, nodes_of_kind, walk};

// Re-export Position and Span from base for convenience
pub use crate::base::{Position, Span};
