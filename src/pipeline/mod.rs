//! Pipeline configuration documents and the reserved-key walker.

mod document;
pub mod walker;

pub use document::{document_paths, load_or_skip, PipelineDocument};
pub use walker::{basename, references, Reference, ReferenceWalker};
