//! Handlers shipped with the crate.

use super::{AnalyzeResult, CustomRecognition, RecognitionArg};
use tracing::info;

/// Placeholder recognizer: confirms it was wired up and never matches.
#[derive(Debug, Default)]
pub struct MyRecognizer;

impl CustomRecognition for MyRecognizer {
    fn analyze(&self, arg: &RecognitionArg) -> Option<AnalyzeResult> {
        info!(node = %arg.node_name, "MyRecognizer invoked");
        None
    }
}
