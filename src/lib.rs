//! # integron_finder
//!
//! Command-line front end of integron_finder: turns an argument vector into a
//! validated [`Config`] for the integron detection pipeline.
//!
//! - [`cli`]: option grammar and [`cli::resolve`]
//! - [`defaults`]: locating `cmsearch`, `hmmsearch` and `prodigal` on `PATH`
//! - [`validate`]: cross-option rules
//! - [`version`]: the `--version` report
//! - [`topology`] and [`seqio`]: per-replicon topology of the input file
//!
//! ### Example
//! ```
//! use integron_finder::cli::{resolve, Environment, Grammar, Outcome};
//!
//! let env = Environment::host().unwrap();
//! match resolve(&Grammar::new(), ["--circ", "genome.fst"], &env).unwrap() {
//!     Outcome::Run(cfg) => assert!(cfg.circular()),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
#[cfg(test)]
mod lockfile;
pub mod logging;
pub mod seqio;
pub mod topology;
pub mod validate;
pub mod version;

pub use config::Config;
pub use error::{UsageError, UsageErrorKind};
