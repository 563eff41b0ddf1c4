//! Core type aliases shared across stages.

use std::collections::BTreeSet;

/// Bare filename of an asset, e.g. `hero.png`
pub type Filename = String;

/// Path relative to the image root, always `/`-separated
pub type CanonicalPath = String;

/// Keys and indices from a document root down to a node
pub type FieldPath = Vec<String>;

/// Basenames referenced anywhere in the pipeline documents
pub type ReferenceSet = BTreeSet<Filename>;
