use env_logger::{Builder, Target};
use log::{LevelFilter, SetLoggerError};

fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .target(Target::Stderr);
    builder
}

/// Install the stderr logger. Verbosity comes from the command line only;
/// `RUST_LOG` is ignored.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    builder(level).try_init()
}
