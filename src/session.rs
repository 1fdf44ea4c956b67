//! Session context tying the access-control pieces together
//!
//! One `Session` owns the tool catalog, the role manager, and the
//! confirmation gateway for a single interactive session. The agent
//! runtime constructs it explicitly and threads it through tool dispatch;
//! there is no process-wide state, so two sessions (or two tests) can
//! never bleed decisions into each other.
//!
//! Per-call flow: `visible_tools` is computed once when the model is given
//! its tool menu; each attempted call then goes through
//! `needs_confirmation`, `confirm` when needed, and the caller executes or
//! aborts based on the decision.

use std::sync::Arc;

use serde_json::Value;

use crate::config;
use crate::confirmation::{ConfirmCallback, ConfirmationGateway, ConfirmationStatus, Decision};
use crate::error::RoleError;
use crate::roles::{Role, RoleManager, RoleSwitchListener};
use crate::tools::{ToolCatalog, ToolDescriptor};

pub struct Session {
    catalog: Arc<ToolCatalog>,
    roles: RoleManager,
    gateway: ConfirmationGateway,
}

impl Session {
    /// Build a session with the built-in catalog and roles loaded from the
    /// default config location
    pub fn new() -> Self {
        Self::with_parts(Arc::new(ToolCatalog::new()), config::load_roles())
    }

    pub fn with_parts(catalog: Arc<ToolCatalog>, roles: RoleManager) -> Self {
        let gateway = ConfirmationGateway::new(catalog.clone());
        Self {
            catalog,
            roles,
            gateway,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn roles(&self) -> &RoleManager {
        &self.roles
    }

    /// Tools the current role may expose to the model
    pub fn visible_tools(&self) -> Vec<&ToolDescriptor> {
        self.roles.filter(&self.catalog)
    }

    pub fn current_role(&self) -> Arc<Role> {
        self.roles.current_role()
    }

    pub fn switch_role(&mut self, role_id: &str) -> Result<(), RoleError> {
        self.roles.switch(role_id)
    }

    pub fn on_role_switch(&mut self, listener: RoleSwitchListener) {
        self.roles.on_switch(listener);
    }

    pub fn set_confirm_callback(&mut self, callback: ConfirmCallback) {
        self.gateway.set_callback(callback);
    }

    pub fn needs_confirmation(&self, tool_name: &str, arguments: &Value) -> bool {
        self.gateway.needs_confirmation(tool_name, arguments)
    }

    pub fn confirm(&mut self, tool_name: &str, arguments: &Value) -> Decision {
        self.gateway.confirm(tool_name, arguments)
    }

    pub fn reset_confirmations(&mut self) {
        self.gateway.reset()
    }

    pub fn confirmation_status(&self) -> ConfirmationStatus {
        self.gateway.status()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
