//! Tool admission policy for one orchestration run.
//!
//! Each tool name may be dispatched at most once per run. The check and the
//! mark are a single synchronous step, so a second request for a name that
//! is already in flight can never be admitted.

use std::collections::HashSet;

/// Tracks which tool names have been admitted during the current run.
#[derive(Debug, Default)]
pub struct DedupPolicy {
    used: HashSet<String>,
}

impl DedupPolicy {
    /// Create a policy with no tools admitted yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a tool name. The first call for a given name returns `true`
    /// and permanently marks it used; every later call returns `false`.
    pub fn admit(&mut self, tool_name: &str) -> bool {
        self.used.insert(tool_name.to_string())
    }

    /// Whether a tool name has already been admitted.
    pub fn is_used(&self, tool_name: &str) -> bool {
        self.used.contains(tool_name)
    }

    /// Names admitted so far, in no particular order.
    pub fn used_names(&self) -> Vec<&str> {
        self.used.iter().map(|s| s.as_str()).collect()
    }
}
