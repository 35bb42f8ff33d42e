//! Command-line grammar of `integron_finder` and its resolution into a [`Config`].
//!
//! [`resolve`] is pure apart from the collaborators carried by [`Environment`]:
//! it never prints and never exits. The process shell in `main` turns its
//! [`Outcome`] or [`UsageError`] into output and an exit status.

use crate::config::Config;
use crate::defaults::{ExecutableLocator, SearchPath, ToolPaths};
use crate::error::{UsageError, UsageErrorKind};
use crate::validate::{self, Draft};
use crate::version::{self, BuildInfo, ProcessProber, VersionProber};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

pub const PROG: &str = "integron_finder";
pub const FLAG_CIRCULAR: &str = "--circ";
pub const FLAG_LINEAR: &str = "--linear";
const FLAG_VERSION: &str = "--version";
const REPLICON: &str = "replicon";

/// Raw command-line values, before defaults and cross-option checks.
#[derive(Parser, Debug, Clone)]
#[command(
    name = PROG,
    about = "integron_finder: search integrons (integrases, attC sites, attI sites and promoters) in DNA sequences",
    disable_version_flag = true,
    args_override_self = true,
    infer_long_args = true
)]
pub struct Args {
    /// Path to the replicon file (in fasta format), eg : path/to/file.fst or file.fst
    #[arg(value_name = REPLICON)]
    pub replicon: Option<PathBuf>,

    /// Use local_max for all replicons (slower, more sensitive)
    #[arg(long = "local-max", visible_alias = "eagle-eyes")]
    pub local_max: bool,

    /// Use the functional annotation HMM profiles on the predicted proteins
    #[arg(long = "func-annot")]
    pub func_annot: bool,

    /// Number of CPUs used by INFERNAL and HMMER
    #[arg(long, value_name = "INT", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub cpu: u32,

    /// Maximum distance (bp) between two attC sites to be part of the same array
    #[arg(long = "distance-thresh", value_name = "INT", default_value_t = 4000)]
    pub distance_threshold: u64,

    /// Directory where the results directory is created (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub outdir: Option<PathBuf>,

    /// Report integrases found by either HMM profile, not only by both
    #[arg(long = "union-integrases")]
    pub union_integrases: bool,

    /// Complete path to cmsearch if not on PATH
    #[arg(long, value_name = "PATH")]
    pub cmsearch: Option<PathBuf>,

    /// Complete path to hmmsearch if not on PATH
    #[arg(long, value_name = "PATH")]
    pub hmmsearch: Option<PathBuf>,

    /// Complete path to prodigal if not on PATH
    #[arg(long, value_name = "PATH")]
    pub prodigal: Option<PathBuf>,

    /// Path to a directory or file of HMM profiles for functional annotation
    #[arg(long = "path-func-annot", value_name = "PATH")]
    pub path_func_annot: Option<PathBuf>,

    /// The input replicons follow the gembase naming convention
    #[arg(long)]
    pub gembase: bool,

    /// Name of the attC covariance model (without the .cm extension)
    #[arg(long = "attc-model", value_name = "NAME", default_value = "attc_4")]
    pub attc_model: String,

    /// E-value threshold for attC site detection
    #[arg(long = "evalue-attc", value_name = "FLOAT", default_value_t = 1.0, allow_negative_numbers = true)]
    pub evalue_attc: f64,

    /// Keep attC hits that are palindromic (same site found on both strands)
    #[arg(long = "keep-palindromes")]
    pub keep_palindromes: bool,

    /// Do not annotate proteins, skipping integrase detection
    #[arg(long = "no-proteins")]
    pub no_proteins: bool,

    /// Maximum attC site length (bp)
    #[arg(long = "max-attc-size", value_name = "INT", default_value_t = 200)]
    pub max_attc_size: usize,

    /// Minimum attC site length (bp)
    #[arg(long = "min-attc-size", value_name = "INT", default_value_t = 40)]
    pub min_attc_size: usize,

    /// Treat every replicon as circular
    #[arg(long = "circ")]
    pub circular: bool,

    /// Treat every replicon as linear
    #[arg(long)]
    pub linear: bool,

    /// File giving the topology of each replicon: '<seq_id> circ|lin' per line
    #[arg(long = "topology-file", value_name = "PATH")]
    pub topology_file: Option<PathBuf>,

    /// Silence all console logging
    #[arg(long)]
    pub mute: bool,

    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Draw a PDF of every complete integron
    #[arg(long)]
    pub pdf: bool,

    /// Write a GenBank file with the integron annotations
    #[arg(long)]
    pub gbk: bool,

    /// Keep intermediate files
    #[arg(long = "keep-tmp")]
    pub keep_tmp: bool,

    /// Write one result file per replicon
    #[arg(long = "split-results")]
    pub split_results: bool,

    /// Print version information and exit
    // The exact spelling is caught before parsing; this field only sees prefixes such as `--vers`.
    #[arg(long, action = ArgAction::SetTrue)]
    pub version: bool,
}

/// The option surface, built once and passed explicitly to [`resolve`].
#[derive(Debug, Clone)]
pub struct Grammar {
    command: clap::Command,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            command: Args::command(),
        }
    }

    pub fn usage(&self) -> String {
        self.command.clone().render_usage().to_string()
    }

    pub fn help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    fn error(&self, kind: UsageErrorKind) -> UsageError {
        UsageError::new(PROG, self.usage(), kind)
    }

    fn clap_error(&self, err: &clap::Error) -> UsageError {
        UsageError::from_clap(PROG, self.usage(), err)
    }
}

/// Host collaborators consulted while resolving.
pub struct Environment {
    /// Directory relative paths are resolved against.
    pub cwd: PathBuf,
    pub locator: Box<dyn ExecutableLocator>,
    pub prober: Box<dyn VersionProber>,
    pub build: BuildInfo,
}

impl Environment {
    /// The running process: its working directory, `PATH` and real subprocesses.
    pub fn host() -> std::io::Result<Self> {
        Ok(Self {
            cwd: std::env::current_dir()?,
            locator: Box::new(SearchPath),
            prober: Box::new(ProcessProber),
            build: BuildInfo::current(),
        })
    }
}

#[derive(Debug)]
pub enum Outcome {
    Run(Box<Config>),
    Version(String),
    Help(String),
}

/// `path` made absolute against `cwd` with `.` and `..` folded away.
pub fn absolute_path(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `--version` anywhere before a `--` terminator wins over everything else.
fn wants_version(argv: &[OsString]) -> bool {
    argv.iter()
        .take_while(|a| a.to_str() != Some("--"))
        .any(|a| a.to_str() == Some(FLAG_VERSION))
}

fn long_names(arg: &clap::Arg) -> Vec<&str> {
    arg.get_long()
        .into_iter()
        .chain(arg.get_all_aliases().unwrap_or_default())
        .collect()
}

/// Id of the argument a `--name` token selects: an exact long name or alias,
/// else the one argument it is an unambiguous prefix of.
fn long_arg_id(command: &clap::Command, name: &str) -> Option<String> {
    if let Some(arg) = command.get_arguments().find(|a| long_names(a).contains(&name)) {
        return Some(arg.get_id().as_str().to_string());
    }
    let mut candidates = command
        .get_arguments()
        .filter(|a| long_names(a).iter().any(|n| n.starts_with(name)));
    match (candidates.next(), candidates.next()) {
        (Some(arg), None) => Some(arg.get_id().as_str().to_string()),
        _ => None,
    }
}

/// Index of the first occurrence of every long option in `argv`, keyed by argument id.
pub fn first_occurrences(command: &clap::Command, argv: &[OsString]) -> HashMap<String, usize> {
    let mut seen = HashMap::new();
    for (idx, token) in argv.iter().enumerate() {
        let Some(token) = token.to_str() else { continue };
        if token == "--" {
            break;
        }
        let Some(name) = token.strip_prefix("--") else { continue };
        let name = name.split('=').next().unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        if let Some(id) = long_arg_id(command, name) {
            seen.entry(id).or_insert(idx);
        }
    }
    seen
}

fn version_outcome(env: &Environment) -> Outcome {
    let tools = version::probe_tools(env.locator.as_ref(), env.prober.as_ref());
    Outcome::Version(version::version_text(&env.build, &tools))
}

/// Turn `argv` (without the program name) into a run configuration.
pub fn resolve<I, T>(grammar: &Grammar, argv: I, env: &Environment) -> Result<Outcome, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    if wants_version(&argv) {
        return Ok(version_outcome(env));
    }
    let first_seen = first_occurrences(&grammar.command, &argv);

    let matches = match grammar
        .command
        .clone()
        .try_get_matches_from(std::iter::once(OsString::from(PROG)).chain(argv.iter().cloned()))
    {
        Ok(matches) => matches,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return Ok(Outcome::Help(err.render().to_string()));
        }
        Err(err) => return Err(grammar.clap_error(&err)),
    };
    let args = Args::from_arg_matches(&matches).map_err(|err| grammar.clap_error(&err))?;
    if args.version {
        return Ok(version_outcome(env));
    }

    validate::validate(&Draft {
        args: &args,
        first_seen: &first_seen,
    })
    .map_err(|kind| grammar.error(kind))?;

    let Some(replicon) = args.replicon.as_deref() else {
        return Err(grammar.error(UsageErrorKind::MissingArguments(vec![REPLICON.to_string()])));
    };

    let tools = ToolPaths {
        cmsearch: args.cmsearch.clone(),
        hmmsearch: args.hmmsearch.clone(),
        prodigal: args.prodigal.clone(),
    }
    .resolve(env.locator.as_ref());

    let outdir = args.outdir.as_deref().unwrap_or(Path::new("."));
    Ok(Outcome::Run(Box::new(Config {
        input_seq_path: absolute_path(&env.cwd, replicon),
        outdir: absolute_path(&env.cwd, outdir),
        local_max: args.local_max,
        func_annot: args.func_annot,
        path_func_annot: args.path_func_annot,
        cpu: args.cpu,
        distance_threshold: args.distance_threshold,
        union_integrases: args.union_integrases,
        model_attc_name: args.attc_model,
        evalue_attc: args.evalue_attc,
        keep_palindromes: args.keep_palindromes,
        no_proteins: args.no_proteins,
        max_attc_size: args.max_attc_size,
        min_attc_size: args.min_attc_size,
        circular: args.circular,
        linear: args.linear,
        topology_file: args.topology_file,
        gembase: args.gembase,
        mute: args.mute,
        verbose: args.verbose,
        quiet: args.quiet,
        pdf: args.pdf,
        gbk: args.gbk,
        keep_tmp: args.keep_tmp,
        split_results: args.split_results,
        tools,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::tests::FakeLocator;
    use crate::topology::TopologyKind;
    use crate::version::tests::{fixed_build, FakeProber};

    const CWD: &str = "/home/user/work";

    fn fake_env(found: &[(&'static str, &str)]) -> Environment {
        Environment {
            cwd: PathBuf::from(CWD),
            locator: Box::new(FakeLocator::with(found)),
            prober: Box::new(FakeProber::standard()),
            build: fixed_build(),
        }
    }

    fn parse_with(env: &Environment, argv: &[&str]) -> Config {
        match resolve(&Grammar::new(), argv.iter().copied(), env) {
            Ok(Outcome::Run(cfg)) => *cfg,
            other => panic!("expected a configuration for {argv:?}, got {other:?}"),
        }
    }

    fn parse(argv: &[&str]) -> Config {
        parse_with(&fake_env(&[]), argv)
    }

    fn usage_error(argv: &[&str]) -> UsageError {
        match resolve(&Grammar::new(), argv.iter().copied(), &fake_env(&[])) {
            Err(err) => err,
            other => panic!("expected a usage error for {argv:?}, got {other:?}"),
        }
    }

    #[test]
    fn replicon_is_made_absolute() {
        let cfg = parse(&["foo"]);
        assert_eq!(cfg.input_seq_path(), Path::new("/home/user/work/foo"));
        let cfg = parse(&["../data/./acba.fst"]);
        assert_eq!(cfg.input_seq_path(), Path::new("/home/user/data/acba.fst"));
        let cfg = parse(&["/abs/rep.fa"]);
        assert_eq!(cfg.input_seq_path(), Path::new("/abs/rep.fa"));
    }

    #[test]
    fn missing_replicon_is_usage_error() {
        let err = usage_error(&[]);
        assert_eq!(err.exit_code(), 2);
        assert!(err
            .diagnostic()
            .ends_with("error: the following arguments are required: replicon\n"));
    }

    #[test]
    fn defaults() {
        let cfg = parse(&["replicon"]);
        assert_eq!(cfg.outdir(), Path::new(CWD));
        assert!(!cfg.local_max());
        assert!(!cfg.func_annot());
        assert_eq!(cfg.path_func_annot(), None);
        assert_eq!(cfg.cpu(), 1);
        assert_eq!(cfg.distance_threshold(), 4000);
        assert!(!cfg.union_integrases());
        assert_eq!(cfg.model_attc_name(), "attc_4");
        assert_eq!(cfg.evalue_attc(), 1.0);
        assert!(!cfg.keep_palindromes());
        assert!(!cfg.no_proteins());
        assert_eq!(cfg.max_attc_size(), 200);
        assert_eq!(cfg.min_attc_size(), 40);
        assert!(!cfg.circular());
        assert!(!cfg.linear());
        assert_eq!(cfg.topology_file(), None);
        assert!(!cfg.gembase());
        assert!(!cfg.mute());
        assert_eq!(cfg.verbose(), 0);
        assert_eq!(cfg.quiet(), 0);
        assert!(!cfg.pdf());
        assert!(!cfg.gbk());
        assert!(!cfg.keep_tmp());
        assert!(!cfg.split_results());
        assert_eq!(cfg.default_topology(), None);
    }

    #[test]
    fn boolean_flags() {
        let cases: [(&str, fn(&Config) -> bool); 14] = [
            ("--local-max", Config::local_max),
            ("--eagle-eyes", Config::local_max),
            ("--func-annot", Config::func_annot),
            ("--union-integrases", Config::union_integrases),
            ("--gembase", Config::gembase),
            ("--keep-palindromes", Config::keep_palindromes),
            ("--no-proteins", Config::no_proteins),
            ("--circ", Config::circular),
            ("--linear", Config::linear),
            ("--mute", Config::mute),
            ("--pdf", Config::pdf),
            ("--gbk", Config::gbk),
            ("--keep-tmp", Config::keep_tmp),
            ("--split-results", Config::split_results),
        ];
        for (flag, get) in cases {
            assert!(!get(&parse(&["replicon"])), "{flag} should default to false");
            assert!(get(&parse(&[flag, "replicon"])), "{flag} should set its field");
        }
    }

    #[test]
    fn local_max_aliases_share_one_field() {
        assert!(parse(&["--local-max", "--eagle-eyes", "replicon"]).local_max());
        assert!(parse(&["--eagle-eyes", "--eagle-eyes", "replicon"]).local_max());
    }

    #[test]
    fn valued_options() {
        let cfg = parse(&[
            "--cpu", "10",
            "--distance-thresh", "50",
            "--attc-model", "foo",
            "--evalue-attc", "5.0",
            "--max-attc-size", "50",
            "--min-attc-size", "45",
            "--path-func-annot", "foo",
            "--topology-file", "foo",
            "replicon",
        ]);
        assert_eq!(cfg.cpu(), 10);
        assert_eq!(cfg.distance_threshold(), 50);
        assert_eq!(cfg.model_attc_name(), "foo");
        assert_eq!(cfg.evalue_attc(), 5.0);
        assert_eq!(cfg.max_attc_size(), 50);
        assert_eq!(cfg.min_attc_size(), 45);
        assert_eq!(cfg.path_func_annot(), Some(Path::new("foo")));
        assert_eq!(cfg.topology_file(), Some(Path::new("foo")));
    }

    #[test]
    fn outdir_is_made_absolute() {
        let cfg = parse(&["--outdir", "foo", "replicon"]);
        assert_eq!(cfg.outdir(), Path::new("/home/user/work/foo"));
        assert_eq!(
            cfg.result_dir(),
            PathBuf::from("/home/user/work/foo/Results_Integron_Finder_replicon")
        );
    }

    #[test]
    fn counting_flags() {
        assert_eq!(parse(&["--verbose", "replicon"]).verbose(), 1);
        assert_eq!(parse(&["-vv", "replicon"]).verbose(), 2);
        assert_eq!(parse(&["-v", "--verbose", "-v", "replicon"]).verbose(), 3);
        assert_eq!(parse(&["--quiet", "replicon"]).quiet(), 1);
        let cfg = parse(&["-qq", "replicon"]);
        assert_eq!(cfg.quiet(), 2);
        assert_eq!(cfg.verbose(), 0);
    }

    #[test]
    fn circular_and_linear_conflict() {
        let err = usage_error(&["--circ", "--linear", "replicon"]);
        assert_eq!(err.exit_code(), 2);
        assert!(err
            .diagnostic()
            .ends_with("error: argument --linear: not allowed with argument --circ\n"));
        assert_eq!(parse(&["--circ", "replicon"]).default_topology(), Some(TopologyKind::Circular));
    }

    #[test]
    fn tools_are_discovered_unless_given() {
        let env = fake_env(&[("cmsearch", "/bin/cmsearch"), ("prodigal", "/bin/prodigal")]);
        let cfg = parse_with(&env, &["replicon"]);
        assert_eq!(cfg.cmsearch(), Some(Path::new("/bin/cmsearch")));
        assert_eq!(cfg.hmmsearch(), None);
        assert_eq!(cfg.prodigal(), Some(Path::new("/bin/prodigal")));

        let cfg = parse_with(
            &env,
            &["--cmsearch", "foo", "--hmmsearch", "foo", "--prodigal", "foo", "replicon"],
        );
        assert_eq!(cfg.cmsearch(), Some(Path::new("foo")));
        assert_eq!(cfg.hmmsearch(), Some(Path::new("foo")));
        assert_eq!(cfg.prodigal(), Some(Path::new("foo")));
    }

    #[test]
    fn host_tools_match_search_path() {
        let env = Environment::host().unwrap();
        let cfg = parse_with(&env, &["replicon"]);
        assert_eq!(cfg.cmsearch().map(Path::to_path_buf), which::which("cmsearch").ok());
        assert_eq!(cfg.hmmsearch().map(Path::to_path_buf), which::which("hmmsearch").ok());
        assert_eq!(cfg.prodigal().map(Path::to_path_buf), which::which("prodigal").ok());
        assert_eq!(cfg.input_seq_path(), env.cwd.join("replicon"));
    }

    #[test]
    fn version_short_circuits() {
        let env = fake_env(&[("prodigal", "/bin/prodigal"), ("cmsearch", "/bin/cmsearch")]);
        let expected = version::version_text(
            &fixed_build(),
            &version::probe_tools(env.locator.as_ref(), env.prober.as_ref()),
        );
        for argv in [
            vec!["--version"],
            vec!["replicon", "--version"],
            vec!["--circ", "--linear", "--version"],
        ] {
            match resolve(&Grammar::new(), argv.iter().copied(), &env) {
                Ok(Outcome::Version(text)) => assert_eq!(text, expected),
                other => panic!("expected version text for {argv:?}, got {other:?}"),
            }
        }
        assert!(expected.contains(" - INFERNAL 1.1.4 (Dec 2020)\n - hmmsearch not found\n"));
    }

    #[test]
    fn version_after_terminator_is_a_positional() {
        let cfg = parse(&["--", "--version"]);
        assert_eq!(cfg.input_seq_path(), Path::new("/home/user/work/--version"));
    }

    #[test]
    fn unambiguous_prefixes_select_long_options() {
        let cfg = parse(&["--eagle", "--dist", "50", "replicon"]);
        assert!(cfg.local_max());
        assert_eq!(cfg.distance_threshold(), 50);

        match resolve(&Grammar::new(), ["--vers"], &fake_env(&[])) {
            Ok(Outcome::Version(text)) => assert!(text.starts_with("integron_finder version ")),
            other => panic!("expected version text, got {other:?}"),
        }
    }

    #[test]
    fn first_occurrences_stop_at_terminator() {
        let grammar = Grammar::new();
        let argv: Vec<OsString> = ["--outdir=res", "--circ", "--eagle", "--outdir", "x", "--", "--linear"]
            .iter()
            .map(OsString::from)
            .collect();
        let seen = first_occurrences(&grammar.command, &argv);
        assert_eq!(seen.get("outdir"), Some(&0));
        assert_eq!(seen.get("circular"), Some(&1));
        assert_eq!(seen.get("local_max"), Some(&2));
        assert_eq!(seen.get("linear"), None);
    }

    #[test]
    fn help_is_not_an_error() {
        match resolve(&Grammar::new(), ["--help"], &fake_env(&[])) {
            Ok(Outcome::Help(text)) => {
                assert!(text.contains("eagle-eyes"));
                assert!(text.contains("--distance-thresh"));
            }
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn grammar_rejections_are_usage_errors() {
        for argv in [
            vec!["--cpu", "0", "replicon"],
            vec!["--cpu", "many", "replicon"],
            vec!["--no-such-flag", "replicon"],
            vec!["replicon", "another"],
        ] {
            let err = usage_error(&argv);
            assert!(matches!(err.kind(), UsageErrorKind::Parse(_)), "{argv:?}");
            assert_eq!(err.exit_code(), 2);
            assert!(err.diagnostic().contains("integron_finder: error: "));
        }
    }
}
