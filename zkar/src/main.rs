#![forbid(unsafe_code)]
/*!
 Command line tool to dump Java serialization streams.
*/

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod exporters;

use app::{
    error::RuntimeError,
    options::{get_command, Action, SUBCOMMAND_GENERATE},
    runtime::Config,
};

/// Environment variable holding the log filter, i.e. `ZKAR_LOG=serz=debug`
const LOG_ENV: &str = "ZKAR_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), RuntimeError> {
    let args = get_command().get_matches();
    match Action::from_args(&args)? {
        Action::Dump(options) => Config::new(options)?.start(),
        Action::Generate => Err(RuntimeError::Unimplemented(SUBCOMMAND_GENERATE)),
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            eprintln!("[error] {why}");
            ExitCode::FAILURE
        }
    }
}
