//! Usage errors raised while turning the command line into a [`Config`](crate::config::Config).
//!
//! Messages follow the wording scripts around integron_finder already scrape
//! from stderr, e.g. `error: argument --linear: not allowed with argument --circ`.

use thiserror::Error;

/// Exit status for any usage error.
pub const USAGE_EXIT_CODE: u8 = 2;

/// What went wrong with the command line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageErrorKind {
    /// One or more required positionals were not supplied.
    #[error("the following arguments are required: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    /// Two mutually exclusive flags were supplied; `arg` is the later one.
    #[error("argument {arg}: not allowed with argument {prior}")]
    NotAllowedWith { arg: String, prior: String },

    /// Anything the grammar itself rejected (unknown flag, bad integer, ...).
    #[error("{0}")]
    Parse(String),
}

/// A usage error together with the usage line it is reported under.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct UsageError {
    prog: String,
    usage: String,
    kind: UsageErrorKind,
}

impl UsageError {
    pub fn new(prog: impl Into<String>, usage: impl Into<String>, kind: UsageErrorKind) -> Self {
        Self {
            prog: prog.into(),
            usage: usage.into(),
            kind,
        }
    }

    /// Build from a clap error, keeping only clap's one-line description.
    pub fn from_clap(prog: impl Into<String>, usage: impl Into<String>, err: &clap::Error) -> Self {
        let rendered = err.render().to_string();
        let first = rendered.lines().next().unwrap_or_default();
        let message = first.strip_prefix("error: ").unwrap_or(first).trim().to_string();
        Self::new(prog, usage, UsageErrorKind::Parse(message))
    }

    pub fn kind(&self) -> &UsageErrorKind {
        &self.kind
    }

    pub fn exit_code(&self) -> u8 {
        USAGE_EXIT_CODE
    }

    /// Full text for stderr: the usage line, then `<prog>: error: <message>`.
    pub fn diagnostic(&self) -> String {
        format!("{}\n{}: error: {}\n", self.usage.trim_end(), self.prog, self.kind)
    }
}
