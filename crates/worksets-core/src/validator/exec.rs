use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use tracing::warn;

use super::{MAX_EXEC_LENGTH, SHELL_METACHARS, safe_string};

/// Desktop-entry field codes (`%f`, `%U`, ...) substituted by the launcher.
static FIELD_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new("%[uUfFdDnNickvm]").expect("invalid field code regex"));

pub fn has_shell_metachars(value: &str) -> bool {
    value.contains(SHELL_METACHARS)
}

/// Replaces every field code in `exec` with `replacement`.
pub fn strip_field_codes<'a>(exec: &'a str, replacement: &str) -> Cow<'a, str> {
    FIELD_CODE.replace_all(exec, replacement)
}

/// Validates a desktop-entry `Exec` line.
///
/// Returns the (length-capped) original string when it is free of shell
/// metacharacters once field codes are ignored, and tokenizes into at least
/// one argument. Anything else yields an empty string.
pub fn validate_exec_string(value: &Value, field_name: &str) -> String {
    let exec = safe_string(value, field_name, MAX_EXEC_LENGTH, "");
    if exec.is_empty() {
        return exec;
    }

    let without_codes = strip_field_codes(&exec, "");
    if has_shell_metachars(without_codes.trim()) {
        warn!(
            "[Validator] {} rejected: contains shell metacharacters: {:?}",
            field_name, exec
        );
        return String::new();
    }

    let tokenizable = strip_field_codes(&exec, " ");
    match shell_words::split(&tokenizable) {
        Ok(argv) if !argv.is_empty() => exec,
        Ok(_) => {
            warn!("[Validator] {} rejected: no command to run", field_name);
            String::new()
        }
        Err(e) => {
            warn!("[Validator] {} rejected: cannot be tokenized: {}", field_name, e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(exec: &str) -> String {
        validate_exec_string(&json!(exec), "exec")
    }

    #[test]
    fn accepts_field_codes_and_plain_arguments() {
        assert_eq!(check("firefox %u"), "firefox %u");
        assert_eq!(check("code --new-window %F"), "code --new-window %F");
        assert_eq!(check("'/opt/My App/bin/app' --flag=1"), "'/opt/My App/bin/app' --flag=1");
    }

    #[test]
    fn rejects_shell_metacharacters() {
        for exec in [
            "rm -rf /; echo hi",
            "a && b",
            "a | b",
            "echo `id`",
            "echo $(id)",
            "echo $HOME",
            "a > /tmp/x",
            "a # comment",
            "a\nb",
            "a\0b",
            "a\\b",
        ] {
            assert_eq!(check(exec), "", "{exec:?} should be rejected");
        }
    }

    #[test]
    fn rejects_untokenizable_or_empty_commands() {
        assert_eq!(check("app 'unterminated"), "");
        assert_eq!(check("%u %F"), "");
        assert_eq!(check("   "), "");
    }

    #[test]
    fn non_strings_become_empty() {
        assert_eq!(validate_exec_string(&json!(["ls"]), "exec"), "");
        assert_eq!(validate_exec_string(&Value::Null, "exec"), "");
    }

    #[test]
    fn metachar_detection() {
        assert!(has_shell_metachars("a;b"));
        assert!(!has_shell_metachars("plain-name_1.0"));
    }
}
