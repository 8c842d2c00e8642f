//! Remote command construction
//!
//! Every remote invocation is assembled from an explicit argument list.
//! Literal arguments are trusted and emitted verbatim; anything that came
//! from a caller goes through `shell_quote` (paths) or `escape_pattern`
//! (search patterns). These two functions are the whole shell-safety story.

use std::fmt;

/// One remote shell invocation, built argument by argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    program: String,
    args: Vec<String>,
}

impl RemoteCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    /// Append a literal argument verbatim (flags, operators, globs already quoted)
    pub fn arg(mut self, literal: &str) -> Self {
        self.args.push(literal.to_string());
        self
    }

    /// Append caller-supplied text as a single single-quoted word
    pub fn quoted(mut self, value: &str) -> Self {
        self.args.push(shell_quote(value));
        self
    }

    /// Append a search pattern inside double quotes (only `"` escaped)
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.args.push(escape_pattern(pattern));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The shell line sent over the exec channel
    pub fn render(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Quote a value as one POSIX shell word.
///
/// Wraps in single quotes; an embedded `'` becomes `'\''`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Embed a regular expression in double quotes, escaping only `"`.
///
/// `$`, backticks and `\` keep their shell meaning inside double quotes, so
/// this is NOT safe against adversarial patterns. It only keeps ordinary
/// regexes containing quotes intact.
pub fn escape_pattern(pattern: &str) -> String {
    format!("\"{}\"", pattern.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote_plain() {
        assert_eq!(shell_quote("/var/log/app"), "'/var/log/app'");
    }

    #[test]
    fn test_shell_quote_spaces_and_quotes() {
        assert_eq!(shell_quote("my logs"), "'my logs'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_shell_quote_neutralizes_substitution() {
        assert_eq!(shell_quote("$(reboot)"), "'$(reboot)'");
    }

    #[test]
    fn test_escape_pattern_only_escapes_double_quote() {
        assert_eq!(escape_pattern("ERROR"), "\"ERROR\"");
        assert_eq!(escape_pattern(r#"msg="x""#), r#""msg=\"x\"""#);
        // Intentionally left alone
        assert_eq!(escape_pattern("a$b"), "\"a$b\"");
        assert_eq!(escape_pattern(r"\d+"), "\"\\d+\"");
    }

    #[test]
    fn test_render_joins_arguments() {
        let cmd = RemoteCommand::new("ls")
            .arg("-lA")
            .arg("--")
            .quoted("/var/log/my app");
        assert_eq!(cmd.render(), "ls -lA -- '/var/log/my app'");
        assert_eq!(cmd.to_string(), cmd.render());
        assert_eq!(cmd.program(), "ls");
    }
}
