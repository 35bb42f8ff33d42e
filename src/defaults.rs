//! Default resolution for the external executables integron_finder drives.
//!
//! Each tool is looked up on `PATH` unless the user named a path explicitly.
//! A tool that cannot be found resolves to `None`; deciding whether that is
//! fatal is left to whoever consumes the [`Config`](crate::config::Config).

use std::fmt;
use std::path::{Path, PathBuf};

/// The external binaries whose location is part of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Cmsearch,
    Hmmsearch,
    Prodigal,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Cmsearch, Tool::Hmmsearch, Tool::Prodigal];

    /// Executable name looked up on the search path.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Cmsearch => "cmsearch",
            Tool::Hmmsearch => "hmmsearch",
            Tool::Prodigal => "prodigal",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps an executable name to an absolute path, if the host has one.
pub trait ExecutableLocator {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Looks executables up on the process `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchPath;

impl ExecutableLocator for SearchPath {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Resolved locations of every [`Tool`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub cmsearch: Option<PathBuf>,
    pub hmmsearch: Option<PathBuf>,
    pub prodigal: Option<PathBuf>,
}

impl ToolPaths {
    pub fn get(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Cmsearch => self.cmsearch.as_deref(),
            Tool::Hmmsearch => self.hmmsearch.as_deref(),
            Tool::Prodigal => self.prodigal.as_deref(),
        }
    }

    fn slot(&mut self, tool: Tool) -> &mut Option<PathBuf> {
        match tool {
            Tool::Cmsearch => &mut self.cmsearch,
            Tool::Hmmsearch => &mut self.hmmsearch,
            Tool::Prodigal => &mut self.prodigal,
        }
    }

    /// Fill every slot that is still empty from `locator`.
    ///
    /// Explicit values are kept verbatim, even relative ones. Lookups are
    /// independent: a miss on one tool does not affect the others.
    pub fn resolve(mut self, locator: &dyn ExecutableLocator) -> Self {
        for tool in Tool::ALL {
            let slot = self.slot(tool);
            if slot.is_none() {
                *slot = locator.locate(tool.name());
            }
        }
        self
    }
}
