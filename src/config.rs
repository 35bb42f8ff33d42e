//! The resolved run configuration handed to the detection pipeline.
//!
//! A [`Config`] is only ever built by [`crate::cli::resolve`]; once returned it
//! is read-only.

use crate::defaults::{Tool, ToolPaths};
use crate::topology::TopologyKind;
use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Prefix of the per-replicon-file results directory.
pub const RESULTS_DIR_PREFIX: &str = "Results_Integron_Finder_";

const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];
const DEFAULT_LEVEL_IDX: i64 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub(crate) input_seq_path: PathBuf,
    pub(crate) outdir: PathBuf,
    pub(crate) local_max: bool,
    pub(crate) func_annot: bool,
    pub(crate) path_func_annot: Option<PathBuf>,
    pub(crate) cpu: u32,
    pub(crate) distance_threshold: u64,
    pub(crate) union_integrases: bool,
    pub(crate) model_attc_name: String,
    pub(crate) evalue_attc: f64,
    pub(crate) keep_palindromes: bool,
    pub(crate) no_proteins: bool,
    pub(crate) max_attc_size: usize,
    pub(crate) min_attc_size: usize,
    pub(crate) circular: bool,
    pub(crate) linear: bool,
    pub(crate) topology_file: Option<PathBuf>,
    pub(crate) gembase: bool,
    pub(crate) mute: bool,
    pub(crate) verbose: u8,
    pub(crate) quiet: u8,
    pub(crate) pdf: bool,
    pub(crate) gbk: bool,
    pub(crate) keep_tmp: bool,
    pub(crate) split_results: bool,
    pub(crate) tools: ToolPaths,
}

impl Config {
    /// Absolute, normalized path of the replicon file.
    pub fn input_seq_path(&self) -> &Path {
        &self.input_seq_path
    }

    pub fn replicon_path(&self) -> &Path {
        &self.input_seq_path
    }

    /// Directory holding the replicon file.
    pub fn input_dir(&self) -> &Path {
        self.input_seq_path.parent().unwrap_or(Path::new("/"))
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// Set by `--local-max` as well as `--eagle-eyes`.
    pub fn local_max(&self) -> bool {
        self.local_max
    }

    pub fn func_annot(&self) -> bool {
        self.func_annot
    }

    pub fn path_func_annot(&self) -> Option<&Path> {
        self.path_func_annot.as_deref()
    }

    pub fn cpu(&self) -> u32 {
        self.cpu
    }

    /// Maximum distance in bp between two attC sites of the same array.
    pub fn distance_threshold(&self) -> u64 {
        self.distance_threshold
    }

    pub fn union_integrases(&self) -> bool {
        self.union_integrases
    }

    pub fn model_attc_name(&self) -> &str {
        &self.model_attc_name
    }

    /// File name of the covariance model for `model_attc_name`.
    pub fn model_attc_file(&self) -> String {
        format!("{}.cm", self.model_attc_name)
    }

    pub fn evalue_attc(&self) -> f64 {
        self.evalue_attc
    }

    pub fn keep_palindromes(&self) -> bool {
        self.keep_palindromes
    }

    pub fn no_proteins(&self) -> bool {
        self.no_proteins
    }

    pub fn max_attc_size(&self) -> usize {
        self.max_attc_size
    }

    pub fn min_attc_size(&self) -> usize {
        self.min_attc_size
    }

    pub fn circular(&self) -> bool {
        self.circular
    }

    pub fn linear(&self) -> bool {
        self.linear
    }

    /// Topology forced on every replicon by `--circ` / `--linear`, if any.
    pub fn default_topology(&self) -> Option<TopologyKind> {
        if self.circular {
            Some(TopologyKind::Circular)
        } else if self.linear {
            Some(TopologyKind::Linear)
        } else {
            None
        }
    }

    pub fn topology_file(&self) -> Option<&Path> {
        self.topology_file.as_deref()
    }

    pub fn gembase(&self) -> bool {
        self.gembase
    }

    pub fn mute(&self) -> bool {
        self.mute
    }

    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    pub fn quiet(&self) -> u8 {
        self.quiet
    }

    /// Console log level: WARN, one step down per `-v`, one step up per `-q`.
    pub fn log_level(&self) -> LevelFilter {
        if self.mute {
            return LevelFilter::Off;
        }
        let idx = DEFAULT_LEVEL_IDX + i64::from(self.verbose) - i64::from(self.quiet);
        LEVELS[idx.clamp(0, LEVELS.len() as i64 - 1) as usize]
    }

    pub fn pdf(&self) -> bool {
        self.pdf
    }

    pub fn gbk(&self) -> bool {
        self.gbk
    }

    pub fn keep_tmp(&self) -> bool {
        self.keep_tmp
    }

    pub fn split_results(&self) -> bool {
        self.split_results
    }

    pub fn cmsearch(&self) -> Option<&Path> {
        self.tools.get(Tool::Cmsearch)
    }

    pub fn hmmsearch(&self) -> Option<&Path> {
        self.tools.get(Tool::Hmmsearch)
    }

    pub fn prodigal(&self) -> Option<&Path> {
        self.tools.get(Tool::Prodigal)
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    /// Tools the run needs but that could not be located.
    pub fn missing_executables(&self) -> Vec<Tool> {
        Tool::ALL
            .into_iter()
            .filter(|tool| !(self.no_proteins && *tool == Tool::Prodigal))
            .filter(|tool| self.tools.get(*tool).is_none())
            .collect()
    }

    /// `<outdir>/Results_Integron_Finder_<replicon file stem>`
    pub fn result_dir(&self) -> PathBuf {
        let stem = self
            .input_seq_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.outdir.join(format!("{RESULTS_DIR_PREFIX}{stem}"))
    }

    pub fn tmp_dir(&self, replicon_id: &str) -> PathBuf {
        self.result_dir().join(format!("tmp_{replicon_id}"))
    }
}
