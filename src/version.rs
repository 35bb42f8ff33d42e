//! `--version` text: our own version, the toolchain and crates we were built
//! with, and the versions of the external executables found on `PATH`.
//!
//! Scripts scrape this output, so everything except the substituted version
//! strings is fixed text.

use crate::defaults::{ExecutableLocator, Tool};
use std::io;
use std::path::Path;
use std::process::Command;

/// Versions captured when the binary was built (see `build.rs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub crate_version: String,
    pub rustc: String,
    pub clap: String,
    pub flate2: String,
    pub which: String,
    pub env_logger: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            rustc: env!("VERGEN_RUSTC_SEMVER").to_string(),
            clap: env!("INTEGRON_CLAP_VERSION").to_string(),
            flate2: env!("INTEGRON_FLATE2_VERSION").to_string(),
            which: env!("INTEGRON_WHICH_VERSION").to_string(),
            env_logger: env!("INTEGRON_ENV_LOGGER_VERSION").to_string(),
        }
    }
}

/// Captured output of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs an executable with the given arguments and captures its output.
pub trait VersionProber {
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<ProbeOutput>;
}

/// Spawns the real process and waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessProber;

impl VersionProber for ProcessProber {
    fn run(&self, program: &Path, args: &[&str]) -> io::Result<ProbeOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(ProbeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn version_flag(tool: Tool) -> &'static str {
    match tool {
        Tool::Prodigal => "-v",
        Tool::Cmsearch | Tool::Hmmsearch => "-h",
    }
}

/// `Prodigal V2.6.3: February, 2016`, printed on stderr.
fn parse_prodigal(out: &ProbeOutput) -> Option<String> {
    [&out.stderr, &out.stdout]
        .into_iter()
        .flat_map(|s| s.lines())
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Infernal and HMMER print a banner whose second line is
/// `# HMMER 3.3.2 (Nov 2020); http://hmmer.org/`.
fn parse_eddy_banner(out: &ProbeOutput) -> Option<String> {
    let line = out.stdout.lines().nth(1)?;
    if !line.starts_with('#') {
        return None;
    }
    let version = line.trim_start_matches(|c: char| c == '#' || c == ' ').trim_end();
    (!version.is_empty()).then(|| version.to_string())
}

/// Version string of `tool` at `path`; never fails.
pub fn tool_version(tool: Tool, path: Option<&Path>, prober: &dyn VersionProber) -> String {
    let Some(path) = path else {
        return format!("{tool} not found");
    };
    let parsed = prober
        .run(path, &[version_flag(tool)])
        .ok()
        .and_then(|out| match tool {
            Tool::Prodigal => parse_prodigal(&out),
            Tool::Cmsearch | Tool::Hmmsearch => parse_eddy_banner(&out),
        });
    parsed.unwrap_or_else(|| format!("{tool} version unknown"))
}

/// Probe the three external tools as found by `locator`.
pub fn probe_tools(locator: &dyn ExecutableLocator, prober: &dyn VersionProber) -> [String; 3] {
    [Tool::Prodigal, Tool::Cmsearch, Tool::Hmmsearch].map(|tool| {
        let path = locator.locate(tool.name());
        tool_version(tool, path.as_deref(), prober)
    })
}

/// Render the full `--version` text; `tools` is prodigal, cmsearch, hmmsearch.
pub fn version_text(build: &BuildInfo, tools: &[String; 3]) -> String {
    let [prodigal, cmsearch, hmmsearch] = tools;
    format!(
        "integron_finder version {crate_version}
Using:\x20\x20\x20\x20
 - Rust {rustc}
 - clap {clap}
 - flate2 {flate2}
 - which {which}
 - env_logger {env_logger}

 - {prodigal}
 - {cmsearch}
 - {hmmsearch}

Authors:
 - Jean Cury, Bertrand Neron, Eduardo Rocha,

Citation:

 Identification and analysis of integrons and cassette arrays in bacterial genomes
 Jean Cury; Thomas Jove; Marie Touchon; Bertrand Neron; Eduardo PC Rocha
 Nucleic Acids Research 2016; doi: 10.1093/nar/gkw319

 If you use --func-annot in conjunction with file NCBIfam-AMRFinder.hmm please also cite

 Haft, DH et al., Nucleic Acids Res. 2018 Jan 4;46(D1):D851-D860
 PMID: 29112715
",
        crate_version = build.crate_version,
        rustc = build.rustc,
        clap = build.clap,
        flate2 = build.flate2,
        which = build.which,
        env_logger = build.env_logger,
    )
}
