//! Canned traces for the shell commands the edge table was derived from.

use clap::ValueEnum;

/// A shell command whose callback sequence ships with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// `touch` on a new and an existing file.
    Touch,
    /// `cat` of an existing file.
    Cat,
    /// `echo > file` on a new and an existing file.
    Redirect,
    /// `echo >> file` on a new and an existing file.
    Append,
    /// `truncate -s` on a new and an existing file.
    Truncate,
    /// `ls -l` of the root.
    Ls,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Touch,
        Scenario::Cat,
        Scenario::Redirect,
        Scenario::Append,
        Scenario::Truncate,
        Scenario::Ls,
    ];

    /// The trace text.
    pub fn trace(&self) -> &'static str {
        match self {
            Scenario::Touch => include_str!("../traces/touch.trace"),
            Scenario::Cat => include_str!("../traces/cat.trace"),
            Scenario::Redirect => include_str!("../traces/redirect.trace"),
            Scenario::Append => include_str!("../traces/append.trace"),
            Scenario::Truncate => include_str!("../traces/truncate.trace"),
            Scenario::Ls => include_str!("../traces/ls.trace"),
        }
    }
}
