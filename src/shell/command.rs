//! Typed shell command strings
//!
//! `CommandBuilder` only accepts `&'static str` literal text, validated
//! paths and numbers, so a runtime string can never be spliced into a script
//! without passing the path validator first.

use std::fmt;

use super::safe_path::SafePath;

/// A script interpreted by `/bin/sh -c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    /// Start building a command from literal text and validated values
    pub fn builder() -> CommandBuilder {
        CommandBuilder::default()
    }

    /// Wrap a command typed by the operator
    ///
    /// The operator already has a shell on the device, so the command is
    /// taken as-is and surrounding whitespace is trimmed.
    pub fn operator(script: impl AsRef<str>) -> Self {
        Self(script.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental builder for [`Command`]
#[derive(Debug, Default)]
pub struct CommandBuilder {
    script: String,
}

impl CommandBuilder {
    /// Append literal shell text
    pub fn text(mut self, text: &'static str) -> Self {
        self.script.push_str(text);
        self
    }

    /// Append literal shell text followed by a newline
    pub fn line(self, text: &'static str) -> Self {
        self.text(text).text("\n")
    }

    /// Append a validated path, single-quoted
    pub fn path(mut self, path: &SafePath) -> Self {
        self.script.push('\'');
        self.script.push_str(path.as_str());
        self.script.push('\'');
        self
    }

    /// Append the last component of a validated path, single-quoted
    pub fn file_name(mut self, path: &SafePath) -> Self {
        self.script.push('\'');
        self.script.push_str(path.file_name());
        self.script.push('\'');
        self
    }

    /// Append several validated paths, each single-quoted, separated by spaces
    pub fn paths<'a>(mut self, paths: impl IntoIterator<Item = &'a SafePath>) -> Self {
        for (i, path) in paths.into_iter().enumerate() {
            if i > 0 {
                self.script.push(' ');
            }
            self = self.path(path);
        }
        self
    }

    /// Append a number
    pub fn number(mut self, n: u16) -> Self {
        self.script.push_str(&n.to_string());
        self
    }

    /// Append another command verbatim
    pub fn command(mut self, command: &Command) -> Self {
        self.script.push_str(command.as_str());
        self
    }

    pub fn build(self) -> Command {
        Command(self.script.trim().to_string())
    }
}
