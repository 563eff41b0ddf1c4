//! Agent host boundary.

use super::{Handler, LoadReport, PluginRegistry};
use crate::config::AgentConfig;
use crate::error::AssetError;
use tracing::info;

/// Anything that accepts named handlers.
pub trait PluginHost {
    /// Returns false when the host refuses the handler.
    fn register_named_handler(&mut self, name: &str, handler: Handler) -> bool;
}

/// A long-running agent server that owns the recognition/action loop.
pub trait AgentServer: PluginHost {
    fn start_up(&mut self, socket_id: &str) -> bool;
    /// Blocks until the server stops.
    fn join(&mut self);
    fn shut_down(&mut self);
}

/// Register every plugin, then run the server on the configured socket until it stops.
pub fn serve(
    server: &mut dyn AgentServer,
    registry: &PluginRegistry,
    agent: &AgentConfig,
) -> Result<LoadReport, AssetError> {
    let socket_id = agent.socket_id.as_str();
    let report = registry.load_into(&mut *server);
    info!(
        socket_id,
        registered = report.registered.len(),
        rejected = report.rejected.len(),
        "Starting agent server"
    );
    if !server.start_up(socket_id) {
        return Err(AssetError::Host(format!(
            "agent server failed to start on socket {}",
            socket_id
        )));
    }
    server.join();
    server.shut_down();
    info!(socket_id, "Agent server shut down");
    Ok(report)
}
