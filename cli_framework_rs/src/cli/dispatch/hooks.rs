//! Lifecycle hooks.
//!
//! Hooks are grouped per [`HookEvent`] and run strictly in registration
//! order, each awaited before the next starts. Whether a failing hook stops
//! the remaining ones is decided by the caller (`continue_on_error`), except
//! for `error` hooks which are always best-effort.

use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::cli::command::ParsedArguments;
use crate::context::CommandContext;
use crate::error::{CliError, CliResult, ErrorReport};

/// Points in the dispatch pipeline where hooks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    PreParse,
    PostParse,
    PreCommand,
    PostCommand,
    Error,
}

impl HookEvent {
    pub const ALL: [HookEvent; 5] = [
        HookEvent::PreParse,
        HookEvent::PostParse,
        HookEvent::PreCommand,
        HookEvent::PostCommand,
        HookEvent::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::PreParse => "preparse",
            HookEvent::PostParse => "postparse",
            HookEvent::PreCommand => "precommand",
            HookEvent::PostCommand => "postcommand",
            HookEvent::Error => "error",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("Unknown hook event '{}'", s))
    }
}

/// State visible to (and mutable by) hooks during one invocation.
#[derive(Debug)]
pub struct HookContext {
    /// Resolved command path joined with spaces; the first path token before
    /// resolution, `None` when no command was named.
    pub command: Option<String>,
    /// Empty placeholder during `preparse`, the live parse afterwards.
    pub args: ParsedArguments,
    pub context: CommandContext,
    /// Set only while `error` hooks run.
    pub error: Option<ErrorReport>,
}

impl HookContext {
    pub fn new(args: ParsedArguments, context: CommandContext) -> Self {
        Self {
            command: None,
            args,
            context,
            error: None,
        }
    }
}

pub type Hook =
    Arc<dyn for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, CliResult<()>> + Send + Sync>;

/// Wrap a closure as a [`Hook`].
pub fn hook<F>(body: F) -> Hook
where
    F: for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, CliResult<()>> + Send + Sync + 'static,
{
    Arc::new(body)
}

#[derive(Clone, Default)]
pub struct HookTable {
    hooks: HashMap<HookEvent, Vec<Hook>>,
}

impl HookTable {
    pub fn add(&mut self, event: HookEvent, hook: Hook) {
        self.hooks.entry(event).or_default().push(hook);
    }

    pub fn count(&self, event: HookEvent) -> usize {
        self.hooks.get(&event).map_or(0, Vec::len)
    }

    /// Run every hook for `event` in order.
    ///
    /// A panicking hook counts as a failed one.
    pub async fn fire(
        &self,
        event: HookEvent,
        hctx: &mut HookContext,
        continue_on_error: bool,
    ) -> CliResult<()> {
        let Some(hooks) = self.hooks.get(&event) else {
            return Ok(());
        };

        for (index, hook) in hooks.iter().enumerate() {
            debug!(event = event.as_str(), index, "running hook");
            let outcome = AssertUnwindSafe(async { hook(&mut *hctx).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(CliError::from_panic(payload)));

            if let Err(err) = outcome {
                if continue_on_error || event == HookEvent::Error {
                    warn!(event = event.as_str(), index, error = %err, "hook failed; continuing");
                    continue;
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in HookEvent::ALL {
            map.entry(&event.as_str(), &self.count(event));
        }
        map.finish()
    }
}
