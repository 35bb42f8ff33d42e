//! Replicon topology: circular or linear, per sequence id.
//!
//! A topology file lists one replicon per line:
//!
//! ```text
//! # seq_id   topology
//! ACBA.007.P01_1  circ
//! ESCO001.C.00001.C001  linear
//! ```
//!
//! Replicons missing from the file fall back to a default which, unless
//! `--circ` or `--linear` was given, depends on how many replicons the input
//! holds: a lone replicon is assumed circular, several are assumed linear.

use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    Circular,
    Linear,
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyKind::Circular => f.write_str("circ"),
            TopologyKind::Linear => f.write_str("lin"),
        }
    }
}

impl FromStr for TopologyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circ" | "circular" => Ok(TopologyKind::Circular),
            "lin" | "linear" => Ok(TopologyKind::Linear),
            _ => Err(format!("'{s}' is not a valid topology: expected circ or lin")),
        }
    }
}

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("cannot read topology file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("topology file line {line}: expected '<seq_id> <topology>', got '{content}'")]
    Malformed { line: usize, content: String },
    #[error("topology file line {line}: {reason}")]
    UnknownTopology { line: usize, reason: String },
}

#[derive(Debug, Clone)]
pub struct Topology {
    default: TopologyKind,
    entries: HashMap<String, TopologyKind>,
}

impl Topology {
    /// Default topology for an input holding `replicon_count` sequences.
    pub fn default_for(replicon_count: usize, explicit: Option<TopologyKind>) -> TopologyKind {
        explicit.unwrap_or(if replicon_count == 1 {
            TopologyKind::Circular
        } else {
            TopologyKind::Linear
        })
    }

    pub fn new(
        replicon_count: usize,
        explicit: Option<TopologyKind>,
        topology_file: Option<&Path>,
    ) -> Result<Self, TopologyError> {
        let mut topology = Self {
            default: Self::default_for(replicon_count, explicit),
            entries: HashMap::new(),
        };
        if let Some(path) = topology_file {
            let text = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            topology.entries = parse_entries(&text)?;
        }
        Ok(topology)
    }

    pub fn default_kind(&self) -> TopologyKind {
        self.default
    }

    pub fn get(&self, seq_id: &str) -> TopologyKind {
        self.entries.get(seq_id).copied().unwrap_or(self.default)
    }

    /// Topology actually used for a replicon of `len` bp.
    ///
    /// A circular replicon shorter than four times the distance threshold
    /// cannot be wrapped around safely and is scanned as linear.
    pub fn for_replicon(&self, seq_id: &str, len: usize, distance_threshold: u64) -> TopologyKind {
        let kind = self.get(seq_id);
        let min_circular = distance_threshold.saturating_mul(4);
        if kind == TopologyKind::Circular && (len as u64) < min_circular {
            warn!(
                "replicon {seq_id} is too short ({len} bp < {min_circular} bp) to be circular, treating it as linear"
            );
            return TopologyKind::Linear;
        }
        kind
    }
}

fn parse_entries(text: &str) -> Result<HashMap<String, TopologyKind>, TopologyError> {
    let mut entries = HashMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [seq_id, token] = fields.as_slice() else {
            return Err(TopologyError::Malformed {
                line: idx + 1,
                content: line.to_string(),
            });
        };
        let kind = token
            .parse::<TopologyKind>()
            .map_err(|reason| TopologyError::UnknownTopology { line: idx + 1, reason })?;
        entries.insert(seq_id.to_string(), kind);
    }
    Ok(entries)
}
