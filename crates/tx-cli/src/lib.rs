use std::ffi::OsString;

use clap::Parser;
use tx_core::TestXmlError;

mod cli_args;
mod commands;
mod error_map;
mod logging;
mod report_render;
mod source_loader;

pub(crate) use cli_args::{Cli, Mode};
pub(crate) use error_map::emit_error;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    logging::init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, TestXmlError> {
    match cli.command {
        Mode::Validate(args) => commands::run_validate(args),
        Mode::Export(args) => commands::run_export(args),
        Mode::Sessions(args) => commands::run_sessions(args),
        Mode::Format(args) => commands::run_format(args),
        Mode::ValidateDir(args) => commands::run_validate_dir(args),
    }
}
