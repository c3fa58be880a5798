//! Feature registry
//!
//! Explicit metadata about callables and events, looked up by fully
//! qualified identity: which calls always terminate the enclosing behavior,
//! which events are early-exit events, and which calls carry a call-site
//! issue. The built-in registry is created once per process; configuration
//! produces extended copies.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::ast::{CallableId, FeatureSlot};

/// Callables that terminate the calling agent
pub const BUILTIN_EARLY_EXIT: &[&str] = &["io.sarl.api.core.Lifecycle.killMe", "io.sarl.core.Lifecycle.killMe"];

/// Level of a call-site issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallIssueLevel {
    Error,
    Warning,
    Info,
    /// Use the configured severity of `DISCOURAGED_CALL`
    #[default]
    Preference,
}

/// Issue reported where a callable is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscouragedCall {
    pub message: String,
    #[serde(default)]
    pub level: CallIssueLevel,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    early_exit: HashSet<CallableId>,
    early_exit_events: HashSet<String>,
    discouraged: HashMap<CallableId, DiscouragedCall>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding the built-in declarations
    pub fn builtin() -> &'static FeatureRegistry {
        static BUILTIN: OnceLock<FeatureRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = FeatureRegistry::new();
            for id in BUILTIN_EARLY_EXIT {
                registry.mark_early_exit(CallableId::new(*id));
            }
            registry
        })
    }

    pub fn mark_early_exit(&mut self, id: CallableId) {
        self.early_exit.insert(id);
    }

    pub fn mark_early_exit_event(&mut self, event: impl Into<String>) {
        self.early_exit_events.insert(event.into());
    }

    /// Declare a call-site issue. An empty message declares nothing.
    pub fn mark_discouraged(&mut self, id: CallableId, message: impl Into<String>, level: CallIssueLevel) {
        let message = message.into();
        if message.trim().is_empty() {
            return;
        }
        self.discouraged.insert(id, DiscouragedCall { message, level });
    }

    pub fn is_early_exit(&self, id: &CallableId) -> bool {
        self.early_exit.contains(id)
    }

    /// Early-exit test on a raw feature slot. Unlinked proxies are never early exits.
    pub fn is_early_exit_feature(&self, slot: &FeatureSlot) -> bool {
        slot.linked().is_some_and(|id| self.is_early_exit(id))
    }

    /// Whether firing this event type terminates the receiving behavior.
    /// Matches the qualified name, or the simple name of a registered event.
    pub fn is_early_exit_event(&self, event: &str) -> bool {
        self.early_exit_events.contains(event)
            || self
                .early_exit_events
                .iter()
                .any(|registered| registered.rsplit('.').next() == Some(event))
    }

    pub fn discouraged(&self, slot: &FeatureSlot) -> Option<&DiscouragedCall> {
        slot.linked().and_then(|id| self.discouraged.get(id))
    }

    /// Add every declaration of `other`
    pub fn extend(&mut self, other: &FeatureRegistry) {
        self.early_exit.extend(other.early_exit.iter().cloned());
        self.early_exit_events.extend(other.early_exit_events.iter().cloned());
        self.discouraged
            .extend(other.discouraged.iter().map(|(id, call)| (id.clone(), call.clone())));
    }
}
