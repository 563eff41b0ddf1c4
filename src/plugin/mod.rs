//! Plugin Registry
//!
//! Custom actions and recognizers are listed in an explicit registry (name,
//! kind, constructor) and handed to an agent host through [`PluginHost`].
//! Nothing is discovered at runtime.

mod builtin;
mod host;
mod registry;

pub use builtin::MyRecognizer;
pub use host::{serve, AgentServer, PluginHost};
pub use registry::{LoadReport, PluginEntry, PluginRegistry};

use serde::{Deserialize, Serialize};

/// Axis-aligned box in screen coordinates: x, y, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Arguments the host passes to a custom action.
#[derive(Debug, Clone, Default)]
pub struct ActionArg {
    pub task_id: u64,
    pub node_name: String,
    pub custom_action_name: String,
    pub custom_action_param: String,
    pub reco_box: Option<Rect>,
}

/// Arguments the host passes to a custom recognizer.
#[derive(Debug, Clone, Default)]
pub struct RecognitionArg {
    pub task_id: u64,
    pub node_name: String,
    pub custom_recognition_name: String,
    pub custom_recognition_param: String,
}

/// A hit reported by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeResult {
    pub rect: Rect,
    pub detail: String,
}

pub trait CustomAction: Send + Sync {
    /// Returns false when the action failed and the node should not succeed.
    fn run(&self, arg: &ActionArg) -> bool;
}

pub trait CustomRecognition: Send + Sync {
    /// None means nothing was recognized.
    fn analyze(&self, arg: &RecognitionArg) -> Option<AnalyzeResult>;
}

/// Handler category, used for logging and duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Action,
    Recognition,
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerKind::Action => write!(f, "action"),
            HandlerKind::Recognition => write!(f, "recognition"),
        }
    }
}

/// A constructed handler ready for registration.
pub enum Handler {
    Action(Box<dyn CustomAction>),
    Recognition(Box<dyn CustomRecognition>),
}

impl Handler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Handler::Action(_) => HandlerKind::Action,
            Handler::Recognition(_) => HandlerKind::Recognition,
        }
    }
}
