//! integron_finder: resolve the command line, report replicon topologies and
//! hand the configuration over to the detection pipeline.

use anyhow::{Context, Result};
use integron_finder::cli::{self, Environment, Grammar, Outcome};
use integron_finder::defaults::Tool;
use integron_finder::seqio::read_replicons;
use integron_finder::topology::Topology;
use integron_finder::{logging, Config};
use log::{debug, info, warn};
use std::process::ExitCode;

fn run(config: &Config) -> Result<()> {
    logging::init(config.log_level()).context("Failed to initialise logging")?;
    debug!("{config:#?}");

    for tool in Tool::ALL {
        match config.tools().get(tool) {
            Some(path) => debug!("{tool}: {}", path.display()),
            None => debug!("{tool}: not found"),
        }
    }
    for tool in config.missing_executables() {
        warn!("{tool} not found on PATH, give its location with --{tool}");
    }
    if config.min_attc_size() > config.max_attc_size() {
        warn!(
            "--min-attc-size ({}) is greater than --max-attc-size ({}): no attC site can match",
            config.min_attc_size(),
            config.max_attc_size()
        );
    }
    if !(config.evalue_attc() > 0.0) {
        warn!("--evalue-attc {} is not positive: no attC site can match", config.evalue_attc());
    }

    let replicons = read_replicons(config.input_seq_path())?;
    let topology = Topology::new(replicons.len(), config.default_topology(), config.topology_file())
        .context("Failed to load replicon topologies")?;

    for rep in &replicons {
        let kind = topology.for_replicon(&rep.id, rep.len, config.distance_threshold());
        info!("replicon {} ({} bp): {kind}", rep.id, rep.len);
    }
    info!(
        "Resolved {} replicon(s) from {}; results go to {}",
        replicons.len(),
        config.input_seq_path().display(),
        config.result_dir().display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let env = match Environment::host() {
        Ok(env) => env,
        Err(err) => {
            eprintln!("Error: cannot determine the working directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    match cli::resolve(&Grammar::new(), std::env::args_os().skip(1), &env) {
        Ok(Outcome::Version(text)) | Ok(Outcome::Help(text)) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Run(config)) => match run(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprint!("{}", err.diagnostic());
            ExitCode::from(err.exit_code())
        }
    }
}
