//! Call signature derivation
//!
//! A call signature is the equivalence key under which approvals are
//! remembered: two invocations with the same signature share one approval
//! decision. The signature is the tool name alone, or `name:key` where the
//! tool declares a key argument. The key argument name comes from the
//! tool's own descriptor, so the signature logic cannot drift away from
//! the declared schemas.

use serde_json::Value;

use crate::tools::{KeyParam, ToolDescriptor};

/// Derive the call signature for an invocation of `tool` with `arguments`.
///
/// Returns `None` when the tool declares a key argument but the value is
/// missing or empty. Such calls have no recordable signature: they always
/// require confirmation and an `AllowAlways` on them records nothing, so a
/// degenerate call can never widen into a blanket approval.
pub fn call_signature(tool: &ToolDescriptor, arguments: &Value) -> Option<String> {
    let key = match tool.key_param() {
        KeyParam::None => return Some(tool.name().to_string()),
        KeyParam::Command(param) => {
            let command = str_arg(arguments, param)?;
            // Only the executable name distinguishes commands: `ls -la`
            // and `ls /tmp` share one signature, `ls` and `pwd` do not.
            command.split_whitespace().next()?.to_string()
        }
        KeyParam::Path(param) => str_arg(arguments, param)?.replace('\\', "/"),
        KeyParam::Pattern(param) => str_arg(arguments, param)?.to_string(),
    };
    if key.is_empty() {
        return None;
    }
    Some(format!("{}:{}", tool.name(), key))
}

fn str_arg<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments.get(name).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{names, ToolCatalog};
    use serde_json::json;

    fn catalog() -> ToolCatalog {
        ToolCatalog::new()
    }

    #[test]
    fn test_command_signature_keyed_by_first_token() {
        let catalog = catalog();
        let bash = catalog.get(names::BASH_RUN).unwrap();

        let a = call_signature(bash, &json!({"command": "ls -la"}));
        let b = call_signature(bash, &json!({"command": "ls /tmp"}));
        let c = call_signature(bash, &json!({"command": "pwd"}));

        assert_eq!(a, Some("bash_run:ls".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c, Some("bash_run:pwd".to_string()));
    }

    #[test]
    fn test_command_signature_missing_or_empty() {
        let catalog = catalog();
        let bash = catalog.get(names::BASH_RUN).unwrap();

        assert_eq!(call_signature(bash, &json!({})), None);
        assert_eq!(call_signature(bash, &json!({"command": ""})), None);
        assert_eq!(call_signature(bash, &json!({"command": "   "})), None);
    }

    #[test]
    fn test_path_signature_normalizes_backslashes() {
        let catalog = catalog();
        let view = catalog.get(names::VIEW_FILE).unwrap();

        let unix = call_signature(view, &json!({"path": "src/main.rs"}));
        let windows = call_signature(view, &json!({"path": "src\\main.rs"}));

        assert_eq!(unix, Some("view_file:src/main.rs".to_string()));
        assert_eq!(unix, windows);
    }

    #[test]
    fn test_path_signature_distinguishes_paths() {
        let catalog = catalog();
        let view = catalog.get(names::VIEW_FILE).unwrap();

        let a = call_signature(view, &json!({"path": "a.rs"}));
        let b = call_signature(view, &json!({"path": "b.rs"}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_pattern_signature_verbatim() {
        let catalog = catalog();
        let grep = catalog.get(names::GREP_SEARCH).unwrap();

        assert_eq!(
            call_signature(grep, &json!({"query": "fn main"})),
            Some("grep_search:fn main".to_string())
        );
    }

    #[test]
    fn test_no_key_param_collapses_all_calls() {
        let catalog = catalog();
        let status = catalog.get(names::GIT_STATUS).unwrap();

        let a = call_signature(status, &json!({}));
        let b = call_signature(status, &json!({"anything": "at all"}));
        assert_eq!(a, Some("git_status".to_string()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_key_arguments_are_ignored() {
        let catalog = catalog();
        let view = catalog.get(names::VIEW_FILE).unwrap();

        let a = call_signature(view, &json!({"path": "x.rs", "start_line": 1}));
        let b = call_signature(view, &json!({"path": "x.rs", "start_line": 99}));
        assert_eq!(a, b);
    }
}
