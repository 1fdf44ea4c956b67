//! Toolgate - role-scoped tool filtering and session approval for AI coding agents
//!
//! An agent that lets a language model pick side-effecting tools needs two
//! safeguards around every call: a static filter deciding which tools the
//! active role may even offer to the model, and a per-call gateway
//! deciding whether a human has to approve the invocation before it runs.
//! This crate provides both, composed by a session context.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use toolgate::{Decision, Session};
//!
//! let mut session = Session::new();
//! session.set_confirm_callback(Box::new(|_tool, _category, _args| {
//!     // Backed by a terminal prompt in a real agent.
//!     Decision::AllowOnce
//! }));
//!
//! // The model only ever sees the current role's tools.
//! for tool in session.visible_tools() {
//!     println!("{}: {}", tool.name(), tool.description());
//! }
//!
//! // Per call: ask if needed, then execute or abort on the decision.
//! let args = json!({"command": "cargo test"});
//! if session.needs_confirmation("bash_run", &args) {
//!     match session.confirm("bash_run", &args) {
//!         Decision::Deny => { /* abort the call */ }
//!         _ => { /* run the tool */ }
//!     }
//! }
//! ```

mod config;
mod confirmation;
mod error;
mod roles;
mod session;
mod signature;
mod tools;

pub use config::{default_roles_path, load_roles, load_roles_from, parse_roles, RoleEntry};
pub use confirmation::{
    display_category, ConfirmCallback, ConfirmationGateway, ConfirmationStatus, Decision,
};
pub use error::RoleError;
pub use roles::{
    builtin_default_role, tool_category, Role, RoleManager, RoleSwitchListener,
};
pub use session::Session;
pub use signature::call_signature;
pub use tools::{names, schema, KeyParam, ToolCatalog, ToolDescriptor};
