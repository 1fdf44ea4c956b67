//! Tool descriptors and the static catalog
//!
//! Every tool the agent can offer to the model is declared here as a
//! `ToolDescriptor`: a stable name, a human-readable description, a JSON
//! parameter schema, and the declaration of its key argument. The catalog
//! is a plain registration table built in code; adding a tool means adding
//! one `register` call, which keeps the set compile-time checked.

pub mod schema;

use std::collections::HashMap;

use serde_json::Value;

use crate::tools::schema::params;

/// Stable tool name constants
pub mod names {
    // filesystem
    pub const VIEW_FILE: &str = "view_file";
    pub const EDIT_FILE: &str = "edit_file";
    pub const CREATE_FILE: &str = "create_file";
    pub const GREP_SEARCH: &str = "grep_search";
    pub const LIST_DIR: &str = "list_dir";

    // executor
    pub const BASH_RUN: &str = "bash_run";
    pub const CMAKE_BUILD: &str = "cmake_build";
    pub const RUN_TESTS: &str = "run_tests";

    // analyzer
    pub const PARSE_CPP: &str = "parse_cpp";
    pub const FIND_FUNCTIONS: &str = "find_functions";
    pub const GET_DEPENDENCIES: &str = "get_dependencies";

    // git
    pub const GIT_STATUS: &str = "git_status";
    pub const GIT_DIFF: &str = "git_diff";
    pub const GIT_COMMIT: &str = "git_commit";
    pub const GIT_LOG: &str = "git_log";

    // agent
    pub const INSTANT_COMPACT: &str = "instant_compact";
    pub const PROPOSE_OPTIONS: &str = "propose_options";
}

/// Declaration of a tool's key argument.
///
/// The key argument is the single parameter whose value participates in the
/// tool's call signature. The named parameter must exist in the tool's
/// declared schema; this enum is the authoritative source for signature
/// derivation, there is no second table to drift from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyParam {
    /// A shell command line; only its first whitespace-delimited token
    /// (the executable name) participates in the signature.
    Command(&'static str),
    /// A filesystem path; backslashes are normalized to forward slashes
    /// before use.
    Path(&'static str),
    /// A search pattern, used verbatim.
    Pattern(&'static str),
    /// No key argument. All calls to the tool collapse to one signature,
    /// so a single approval covers every future call.
    None,
}

/// A declared tool, as seen by the access-control layers
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    key_param: KeyParam,
    schema: Value,
}

impl ToolDescriptor {
    pub fn new(
        name: &'static str,
        description: &'static str,
        key_param: KeyParam,
        schema: Value,
    ) -> Self {
        Self {
            name,
            description,
            key_param,
            schema,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn key_param(&self) -> KeyParam {
        self.key_param
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Name of the path parameter, if this tool takes one
    pub fn path_param(&self) -> Option<&'static str> {
        match self.key_param {
            KeyParam::Path(name) => Some(name),
            _ => None,
        }
    }
}

/// Registry of declared tools
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: HashMap<&'static str, ToolDescriptor>,
}

impl ToolCatalog {
    /// Create the full built-in catalog
    pub fn new() -> Self {
        let mut catalog = Self::empty();

        catalog.register(ToolDescriptor::new(
            names::VIEW_FILE,
            "View the contents of a file",
            KeyParam::Path("path"),
            params()
                .string("path", "Path of the file to view")
                .integer_opt("start_line", "First line to show")
                .integer_opt("end_line", "Last line to show")
                .build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::EDIT_FILE,
            "Replace a range of lines in an existing file",
            KeyParam::Path("path"),
            params()
                .string("path", "Path of the file to edit")
                .string("old_text", "Exact text to replace")
                .string("new_text", "Replacement text")
                .build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::CREATE_FILE,
            "Create a new file with the given contents",
            KeyParam::Path("path"),
            params()
                .string("path", "Path of the file to create")
                .string("content", "Initial file contents")
                .build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::GREP_SEARCH,
            "Search the workspace for a regex pattern",
            KeyParam::Pattern("query"),
            params()
                .string("query", "Regex pattern to search for")
                .string_opt("path", "Directory to search under")
                .build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::LIST_DIR,
            "List the entries of a directory",
            KeyParam::Path("path"),
            params().string("path", "Directory to list").build(),
        ));

        catalog.register(ToolDescriptor::new(
            names::BASH_RUN,
            "Run a shell command in the workspace",
            KeyParam::Command("command"),
            params()
                .string("command", "Command line to execute")
                .integer_opt("timeout", "Timeout in seconds")
                .build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::CMAKE_BUILD,
            "Configure and build the project with CMake",
            KeyParam::None,
            params().string_opt("target", "Build target").build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::RUN_TESTS,
            "Run the project's test suite",
            KeyParam::None,
            params().string_opt("filter", "Test name filter").build(),
        ));

        catalog.register(ToolDescriptor::new(
            names::PARSE_CPP,
            "Parse a C/C++ source file and report its structure",
            KeyParam::Path("path"),
            params().string("path", "Source file to parse").build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::FIND_FUNCTIONS,
            "Find function definitions matching a pattern",
            KeyParam::Pattern("pattern"),
            params()
                .string("pattern", "Function name pattern")
                .string_opt("path", "Directory to search under")
                .build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::GET_DEPENDENCIES,
            "List the include dependencies of a source file",
            KeyParam::Path("path"),
            params().string("path", "Source file to inspect").build(),
        ));

        catalog.register(ToolDescriptor::new(
            names::GIT_STATUS,
            "Show the working tree status",
            KeyParam::None,
            params().build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::GIT_DIFF,
            "Show uncommitted changes",
            KeyParam::None,
            params().string_opt("path", "Limit the diff to a path").build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::GIT_COMMIT,
            "Commit staged changes",
            KeyParam::None,
            params().string("message", "Commit message").build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::GIT_LOG,
            "Show recent commit history",
            KeyParam::None,
            params().integer_opt("count", "Number of commits").build(),
        ));

        catalog.register(ToolDescriptor::new(
            names::INSTANT_COMPACT,
            "Compact the conversation context",
            KeyParam::None,
            params().build(),
        ));
        catalog.register(ToolDescriptor::new(
            names::PROPOSE_OPTIONS,
            "Present a set of options for the user to pick from",
            KeyParam::None,
            params().string("options", "Options to present").build(),
        ));

        catalog
    }

    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: ToolDescriptor) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
