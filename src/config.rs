//! Role configuration loading
//!
//! Roles are defined in `~/.config/toolgate/roles.toml`:
//!
//! ```toml
//! default_role = "programmer"
//!
//! [roles.programmer]
//! name = "Programmer"
//! description = "C/C++ programming assistant"
//! model = "qwen3:latest"
//! tool_categories = ["filesystem", "executor", "git", "agent"]
//!
//! [roles.reviewer]
//! name = "Reviewer"
//! tool_categories = ["filesystem"]
//! excluded_tools = ["edit_file", "create_file"]
//! ```
//!
//! Loading is lenient at the entry level: a role that fails to parse is
//! skipped with a warning and the remaining roles still load. A missing or
//! unreadable file falls back to the built-in default role.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::roles::{Role, RoleManager};

const DEFAULT_ROLE_ID: &str = "programmer";

/// One role entry as written in roles.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleEntry {
    pub name: Option<String>,
    pub description: String,
    pub icon: String,
    pub model: String,
    pub base_model: String,
    pub tool_categories: Vec<String>,
    pub included_tools: Vec<String>,
    pub excluded_tools: Vec<String>,
}

impl Default for RoleEntry {
    fn default() -> Self {
        Self {
            name: None,
            description: String::new(),
            icon: "🤖".to_string(),
            model: "qwen3:latest".to_string(),
            base_model: "qwen3:latest".to_string(),
            tool_categories: Vec::new(),
            included_tools: Vec::new(),
            excluded_tools: Vec::new(),
        }
    }
}

impl RoleEntry {
    fn into_role(self, id: &str) -> Role {
        Role {
            id: id.to_string(),
            name: self.name.unwrap_or_else(|| id.to_string()),
            description: self.description,
            icon: self.icon,
            model: self.model,
            base_model: self.base_model,
            tool_categories: self.tool_categories,
            included_tools: self.included_tools,
            excluded_tools: self.excluded_tools,
        }
    }
}

/// Top-level shape of roles.toml.
///
/// Role bodies stay as raw TOML values so one malformed entry can be
/// skipped without failing the whole document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RolesFile {
    default_role: Option<String>,
    roles: BTreeMap<String, toml::Value>,
}

/// Load the role manager from the default config location.
///
/// Absence or malformation of the file is not fatal; it degrades to the
/// built-in default role.
pub fn load_roles() -> RoleManager {
    match default_roles_path() {
        Some(path) if path.exists() => load_roles_from(&path),
        _ => RoleManager::new(vec![], DEFAULT_ROLE_ID),
    }
}

/// Load the role manager from a specific roles.toml path
pub fn load_roles_from(path: &Path) -> RoleManager {
    match read_roles_file(path) {
        Ok(content) => parse_roles(&content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read roles config, using built-in default role");
            RoleManager::new(vec![], DEFAULT_ROLE_ID)
        }
    }
}

/// Parse a roles.toml document into a role manager
pub fn parse_roles(content: &str) -> RoleManager {
    let file: RolesFile = match toml::from_str(content) {
        Ok(file) => file,
        Err(e) => {
            warn!(error = %e, "failed to parse roles config, using built-in default role");
            RolesFile::default()
        }
    };

    let mut roles = Vec::new();
    for (id, value) in file.roles {
        match value.try_into::<RoleEntry>() {
            Ok(entry) => roles.push(entry.into_role(&id)),
            Err(e) => {
                warn!(role = %id, error = %e, "skipping malformed role entry");
            }
        }
    }

    let default_id = file.default_role.unwrap_or_else(|| DEFAULT_ROLE_ID.to_string());
    RoleManager::new(roles, &default_id)
}

/// Config directory (~/.config/toolgate)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("toolgate"))
}

/// Default roles.toml path
pub fn default_roles_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("roles.toml"))
}

fn read_roles_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roles file: {}", path.display()))
}
