//! Plugin seam: bundles of commands and hooks installed in one call.

use super::Cli;
use crate::error::CliResult;

pub trait Plugin {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "0.0.0"
    }

    /// Add commands and hooks to `cli`.
    fn register(&self, cli: &mut Cli) -> CliResult<()>;
}

/// Name and version of an installed plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
}
