//! Role definitions and the role manager
//!
//! A role bundles the access-control rules for one operating persona:
//! which tool categories it enables, plus explicit include and exclude
//! lists. Exactly one role is current at a time; switching republishes a
//! new `Arc<Role>` rather than mutating the active one in place, so
//! anything holding a snapshot keeps a consistent view.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

use crate::error::RoleError;
use crate::tools::{ToolCatalog, ToolDescriptor};

/// Category prefix table for role filtering.
///
/// A tool belongs to the first category with a matching name prefix, else
/// `other`. This table is private to role filtering; the confirmation
/// gateway keeps its own display grouping and the two are not assumed to
/// agree.
const CATEGORY_PREFIXES: &[(&str, &[&str])] = &[
    (
        "filesystem",
        &["view_file", "edit_file", "create_file", "grep_search", "list_dir"],
    ),
    ("executor", &["bash_run", "cmake_build", "run_tests"]),
    ("git", &["git"]),
    ("agent", &["instant_compact", "propose_options"]),
    (
        "knowledge",
        &["extract_keywords", "generate_summary", "classify_knowledge", "save_knowledge"],
    ),
];

/// Category a tool name falls into for access-control purposes
pub fn tool_category(tool_name: &str) -> &'static str {
    for (category, prefixes) in CATEGORY_PREFIXES {
        if prefixes.iter().any(|p| tool_name.starts_with(p)) {
            return category;
        }
    }
    "other"
}

/// An operating persona with its access-control rules.
///
/// Immutable once loaded; the only mutation a role participates in is
/// being swapped out as the current role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub model: String,
    pub base_model: String,
    pub tool_categories: Vec<String>,
    pub included_tools: Vec<String>,
    pub excluded_tools: Vec<String>,
}

impl Role {
    /// Whether this role exposes the named tool to the model.
    ///
    /// Priority order, highest first: explicit exclusion drops the tool
    /// even if it is also included or category-enabled; explicit inclusion
    /// keeps it regardless of category; otherwise the tool's category must
    /// be enabled. Unrecognized tools fall into `other`, which is always
    /// kept, so a tool whose category was never registered stays visible
    /// instead of silently disappearing.
    pub fn allows(&self, tool_name: &str) -> bool {
        if self.excluded_tools.iter().any(|t| t == tool_name) {
            return false;
        }
        if self.included_tools.iter().any(|t| t == tool_name) {
            return true;
        }
        let category = tool_category(tool_name);
        category == "other" || self.tool_categories.iter().any(|c| c == category)
    }
}

/// Callback invoked after a successful role switch with (old_id, new_id)
pub type RoleSwitchListener = Box<dyn Fn(&str, &str) + Send>;

/// Owns the role registry and the current-role selection
pub struct RoleManager {
    roles: HashMap<String, Arc<Role>>,
    current: Arc<Role>,
    listeners: Vec<RoleSwitchListener>,
}

impl RoleManager {
    /// Build a manager from loaded roles.
    ///
    /// Falls back to the first role in id order when `default_id` names a
    /// role that doesn't exist, and to the built-in default role when
    /// `roles` is empty.
    pub fn new(roles: Vec<Role>, default_id: &str) -> Self {
        let mut map: HashMap<String, Arc<Role>> = roles
            .into_iter()
            .map(|r| (r.id.clone(), Arc::new(r)))
            .collect();

        if map.is_empty() {
            let fallback = Arc::new(builtin_default_role());
            map.insert(fallback.id.clone(), fallback);
        }

        let current = map
            .get(default_id)
            .cloned()
            .unwrap_or_else(|| {
                let mut ids: Vec<&String> = map.keys().collect();
                ids.sort();
                map[ids[0]].clone()
            });

        Self {
            roles: map,
            current,
            listeners: Vec::new(),
        }
    }

    /// The currently active role
    pub fn current_role(&self) -> Arc<Role> {
        self.current.clone()
    }

    pub fn current_role_id(&self) -> &str {
        &self.current.id
    }

    /// Look up a role by id
    pub fn get_role(&self, role_id: &str) -> Option<Arc<Role>> {
        self.roles.get(role_id).cloned()
    }

    /// All loaded roles, in id order
    pub fn list_roles(&self) -> Vec<Arc<Role>> {
        let mut roles: Vec<Arc<Role>> = self.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.id.cmp(&b.id));
        roles
    }

    /// Model assigned to a role, defaulting to the current role's
    pub fn model_for(&self, role_id: Option<&str>) -> String {
        match role_id {
            Some(id) => self
                .roles
                .get(id)
                .map(|r| r.model.clone())
                .unwrap_or_else(|| self.current.model.clone()),
            None => self.current.model.clone(),
        }
    }

    /// Switch the current role.
    ///
    /// On an unknown id the current role is left unchanged. On success the
    /// new role is published atomically and every registered listener is
    /// invoked; a panicking listener is caught and logged so it cannot
    /// block the switch or starve later listeners.
    pub fn switch(&mut self, role_id: &str) -> Result<(), RoleError> {
        let target = self
            .roles
            .get(role_id)
            .cloned()
            .ok_or_else(|| RoleError::UnknownRole(role_id.to_string()))?;

        let old_id = self.current.id.clone();
        self.current = target;

        for listener in &self.listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(&old_id, role_id)));
            if outcome.is_err() {
                warn!(old_role = %old_id, new_role = %role_id, "role switch listener panicked");
            }
        }

        Ok(())
    }

    /// Register a role-change listener
    pub fn on_switch(&mut self, listener: RoleSwitchListener) {
        self.listeners.push(listener);
    }

    /// Replace the role registry, keeping the current selection when it
    /// survives the reload
    pub fn reload(&mut self, roles: Vec<Role>, default_id: &str) {
        let current_id = self.current.id.clone();
        let listeners = std::mem::take(&mut self.listeners);
        *self = Self::new(roles, default_id);
        self.listeners = listeners;
        if let Some(role) = self.roles.get(&current_id) {
            self.current = role.clone();
        }
    }

    /// Narrow the catalog to the tools the current role may expose.
    ///
    /// Pure with respect to manager state; the returned descriptors borrow
    /// from the catalog.
    pub fn filter<'a>(&self, catalog: &'a ToolCatalog) -> Vec<&'a ToolDescriptor> {
        let role = &self.current;
        catalog.iter().filter(|t| role.allows(t.name())).collect()
    }
}

/// Hard-coded fallback role used when no configuration could be loaded
pub fn builtin_default_role() -> Role {
    Role {
        id: "programmer".to_string(),
        name: "Programmer".to_string(),
        description: "C/C++ programming assistant".to_string(),
        icon: "💻".to_string(),
        model: "qwen3:latest".to_string(),
        base_model: "qwen3:latest".to_string(),
        tool_categories: vec![
            "filesystem".to_string(),
            "executor".to_string(),
            "git".to_string(),
            "agent".to_string(),
        ],
        included_tools: vec![],
        excluded_tools: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{names, ToolCatalog};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn role(id: &str, categories: &[&str], included: &[&str], excluded: &[&str]) -> Role {
        Role {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            icon: String::new(),
            model: "test-model".to_string(),
            base_model: "test-model".to_string(),
            tool_categories: categories.iter().map(|s| s.to_string()).collect(),
            included_tools: included.iter().map(|s| s.to_string()).collect(),
            excluded_tools: excluded.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn filtered_names(manager: &RoleManager, catalog: &ToolCatalog) -> Vec<String> {
        let mut names: Vec<String> = manager
            .filter(catalog)
            .into_iter()
            .map(|t| t.name().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(tool_category("view_file"), "filesystem");
        assert_eq!(tool_category("bash_run"), "executor");
        assert_eq!(tool_category("git_commit"), "git");
        assert_eq!(tool_category("propose_options"), "agent");
        assert_eq!(tool_category("made_up_tool"), "other");
    }

    #[test]
    fn test_exclusion_wins_over_everything() {
        // edit_file is category-enabled AND explicitly included, but the
        // exclusion still drops it.
        let r = role("r", &["filesystem"], &["edit_file"], &["edit_file"]);
        assert!(!r.allows("edit_file"));
        assert!(r.allows("view_file"));
    }

    #[test]
    fn test_inclusion_wins_over_disabled_category() {
        let r = role("r", &["filesystem"], &["bash_run"], &[]);
        assert!(r.allows("bash_run"));
        assert!(!r.allows("cmake_build"));
    }

    #[test]
    fn test_unknown_category_always_kept() {
        let r = role("r", &[], &[], &[]);
        assert!(r.allows("totally_new_tool"));
        assert!(!r.allows("view_file"));
    }

    #[test]
    fn test_reviewer_scenario() {
        let catalog = {
            let mut c = ToolCatalog::empty();
            let full = ToolCatalog::new();
            for name in [names::VIEW_FILE, names::EDIT_FILE, names::BASH_RUN] {
                c.register(full.get(name).unwrap().clone());
            }
            c
        };
        let manager = RoleManager::new(
            vec![role("reviewer", &["filesystem"], &[], &["edit_file"])],
            "reviewer",
        );
        assert_eq!(filtered_names(&manager, &catalog), vec!["view_file"]);
    }

    #[test]
    fn test_switch_unknown_role_leaves_state_unchanged() {
        let catalog = ToolCatalog::new();
        let mut manager = RoleManager::new(
            vec![role("reviewer", &["filesystem"], &[], &[])],
            "reviewer",
        );
        let before = filtered_names(&manager, &catalog);

        let result = manager.switch("nonexistent");
        assert_eq!(result, Err(RoleError::UnknownRole("nonexistent".to_string())));
        assert_eq!(manager.current_role_id(), "reviewer");
        assert_eq!(filtered_names(&manager, &catalog), before);
    }

    #[test]
    fn test_switch_notifies_listeners() {
        let mut manager = RoleManager::new(
            vec![role("a", &[], &[], &[]), role("b", &[], &[], &[])],
            "a",
        );
        let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        manager.on_switch(Box::new(move |old, new| {
            seen_clone.lock().unwrap().push((old.to_string(), new.to_string()));
        }));

        manager.switch("b").unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("a".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn test_panicking_listener_does_not_block_switch() {
        let mut manager = RoleManager::new(
            vec![role("a", &[], &[], &[]), role("b", &[], &[], &[])],
            "a",
        );
        let calls = Arc::new(AtomicUsize::new(0));
        manager.on_switch(Box::new(|_, _| panic!("listener bug")));
        let calls_clone = calls.clone();
        manager.on_switch(Box::new(move |_, _| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));

        manager.switch("b").unwrap();
        assert_eq!(manager.current_role_id(), "b");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_roles_falls_back_to_builtin() {
        let manager = RoleManager::new(vec![], "anything");
        assert_eq!(manager.current_role_id(), "programmer");
        assert!(manager.current_role().allows("bash_run"));
    }

    #[test]
    fn test_missing_default_falls_back_to_first_by_id() {
        let manager = RoleManager::new(
            vec![role("zeta", &[], &[], &[]), role("alpha", &[], &[], &[])],
            "missing",
        );
        assert_eq!(manager.current_role_id(), "alpha");
    }

    #[test]
    fn test_reload_preserves_current_selection() {
        let mut manager = RoleManager::new(
            vec![role("a", &[], &[], &[]), role("b", &[], &[], &[])],
            "a",
        );
        manager.switch("b").unwrap();

        manager.reload(
            vec![role("a", &[], &[], &[]), role("b", &["git"], &[], &[])],
            "a",
        );
        assert_eq!(manager.current_role_id(), "b");
        assert_eq!(manager.current_role().tool_categories, vec!["git"]);
    }

    #[test]
    fn test_model_for() {
        let manager = RoleManager::new(
            vec![role("a", &[], &[], &[]), role("b", &[], &[], &[])],
            "a",
        );
        assert_eq!(manager.model_for(None), "test-model");
        assert_eq!(manager.model_for(Some("b")), "test-model");
        assert_eq!(manager.model_for(Some("missing")), "test-model");
    }

    #[test]
    fn test_list_roles_sorted() {
        let manager = RoleManager::new(
            vec![role("zeta", &[], &[], &[]), role("alpha", &[], &[], &[])],
            "alpha",
        );
        let roles = manager.list_roles();
        let ids: Vec<&str> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
