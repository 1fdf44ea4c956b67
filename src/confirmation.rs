//! Confirmation gateway for tool execution
//!
//! Decides, per attempted tool call, whether a human must approve it
//! before it runs, and remembers `AllowAlways` grants for the rest of the
//! session keyed by call signature. State is purely in-memory: a new
//! session starts out requiring confirmation for everything again.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::signature::call_signature;
use crate::tools::ToolCatalog;

/// Outcome of asking the user about one tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Approve this single invocation; the next identical call asks again
    AllowOnce,
    /// Approve every call with this signature for the rest of the session
    AllowAlways,
    /// Abort this call; the tool name is tracked but future calls still ask
    Deny,
}

/// Synchronous user-decision callback: (tool name, display category, arguments)
pub type ConfirmCallback = Box<dyn FnMut(&str, &str, &Value) -> Decision + Send>;

/// Display grouping for the confirmation prompt.
///
/// Independent of the role filter's category table; this one exists only
/// so the prompt can say what kind of tool is asking, and it has no effect
/// on approval decisions.
const DISPLAY_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "filesystem",
        &["view_file", "edit_file", "create_file", "grep_search", "list_dir"],
    ),
    ("executor", &["bash_run", "cmake_build", "run_tests"]),
    ("analyzer", &["parse_cpp", "find_functions", "get_dependencies"]),
];

/// Category shown alongside a tool in the confirmation prompt
pub fn display_category(tool_name: &str) -> &'static str {
    for (category, prefixes) in DISPLAY_CATEGORIES {
        if prefixes.iter().any(|p| tool_name.starts_with(p)) {
            return category;
        }
    }
    "unknown"
}

/// Snapshot of the gateway's session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfirmationStatus {
    pub allowed_signatures: Vec<String>,
    pub denied_tools: Vec<String>,
}

/// Session-scoped approval state and workflow
pub struct ConfirmationGateway {
    catalog: Arc<ToolCatalog>,
    allowed_signatures: HashSet<String>,
    denied_tools: HashSet<String>,
    callback: Option<ConfirmCallback>,
}

impl ConfirmationGateway {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self {
            catalog,
            allowed_signatures: HashSet::new(),
            denied_tools: HashSet::new(),
            callback: None,
        }
    }

    /// Install the user-decision callback.
    ///
    /// Without one, `confirm` defaults to `AllowOnce`: the call proceeds
    /// but nothing is ever remembered, so a non-interactive context can
    /// never accumulate blanket approvals.
    pub fn set_callback(&mut self, callback: ConfirmCallback) {
        self.callback = Some(callback);
    }

    /// Whether executing `tool_name` with `arguments` requires asking the
    /// user first.
    ///
    /// A previously denied tool asks again rather than being blocked, and
    /// an unknown signature asks. Only an `AllowAlways` grant earlier in
    /// the session skips the prompt.
    pub fn needs_confirmation(&self, tool_name: &str, arguments: &Value) -> bool {
        if self.denied_tools.contains(tool_name) {
            debug!(tool = %tool_name, "tool was denied earlier this session, asking again");
            return true;
        }

        match self.signature_for(tool_name, arguments) {
            Some(signature) if self.allowed_signatures.contains(&signature) => {
                debug!(tool = %tool_name, %signature, "signature allowed for session");
                false
            }
            _ => true,
        }
    }

    /// Ask the user about one tool call and record the outcome.
    ///
    /// Blocks until the callback returns. The caller remains responsible
    /// for actually executing or aborting the tool based on the returned
    /// decision.
    pub fn confirm(&mut self, tool_name: &str, arguments: &Value) -> Decision {
        let Some(callback) = self.callback.as_mut() else {
            return Decision::AllowOnce;
        };

        let category = display_category(tool_name);
        let decision = callback(tool_name, category, arguments);
        debug!(tool = %tool_name, %category, ?decision, "user decision");

        match decision {
            Decision::AllowAlways => {
                if let Some(signature) = signature_in(&self.catalog, tool_name, arguments) {
                    self.allowed_signatures.insert(signature);
                }
            }
            Decision::Deny => {
                self.denied_tools.insert(tool_name.to_string());
            }
            Decision::AllowOnce => {}
        }

        decision
    }

    /// Forget every decision made this session
    pub fn reset(&mut self) {
        self.allowed_signatures.clear();
        self.denied_tools.clear();
    }

    /// Current session state, sorted for stable display
    pub fn status(&self) -> ConfirmationStatus {
        let mut allowed: Vec<String> = self.allowed_signatures.iter().cloned().collect();
        let mut denied: Vec<String> = self.denied_tools.iter().cloned().collect();
        allowed.sort();
        denied.sort();
        ConfirmationStatus {
            allowed_signatures: allowed,
            denied_tools: denied,
        }
    }

    fn signature_for(&self, tool_name: &str, arguments: &Value) -> Option<String> {
        signature_in(&self.catalog, tool_name, arguments)
    }
}

/// Signature for a call, falling back to the bare tool name for tools the
/// catalog doesn't know about
fn signature_in(catalog: &ToolCatalog, tool_name: &str, arguments: &Value) -> Option<String> {
    match catalog.get(tool_name) {
        Some(descriptor) => call_signature(descriptor, arguments),
        None => Some(tool_name.to_string()),
    }
}
