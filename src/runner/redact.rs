//! Secret redaction for echoed invocations.
//!
//! Redaction is a logging concern only: the real values still reach the
//! child process argv and are visible in the process table.

/// Flags whose following value must never appear in logs or terminals.
const SECRET_FLAGS: &[&str] = &["-private-key", "-mnemonic", "-hd-paths", "-hd-path"];

/// Render `command` and `args` as a single line with every secret value
/// replaced by asterisks.
pub fn redacted_command_line(command: &str, args: &[String]) -> String {
    let mut shown = vec![command.to_string()];
    let mut previous_was_secret = false;
    for arg in args {
        if previous_was_secret {
            shown.push("********".to_string());
        } else {
            shown.push(arg.clone());
        }
        previous_was_secret = SECRET_FLAGS.iter().any(|flag| arg.ends_with(flag));
    }
    shown.join(" ")
}
