use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "testxml")]
#[command(about = "Validate, format and export test.xml documents")]
pub(crate) struct Cli {
    #[arg(long, short = 'v', global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Validate(ValidateArgs),
    Export(ExportArgs),
    Sessions(SessionsArgs),
    Format(FormatArgs),
    ValidateDir(ValidateDirArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub(crate) struct ValidateArgs {
    pub(crate) test: PathBuf,
    #[arg(long = "config", env = "TESTXML_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long = "schema", env = "TESTXML_SCHEMA")]
    pub(crate) schema: Option<PathBuf>,
    #[arg(long = "format", value_enum, default_value_t = ReportFormat::Text)]
    pub(crate) format: ReportFormat,
}

#[derive(Debug, Args)]
pub(crate) struct ExportArgs {
    pub(crate) test: PathBuf,
    #[arg(long = "config", env = "TESTXML_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long = "out")]
    pub(crate) out: Option<PathBuf>,
    #[arg(long = "keep-sessions")]
    pub(crate) keep_sessions: bool,
    #[arg(long = "no-substitute")]
    pub(crate) no_substitute: bool,
}

#[derive(Debug, Args)]
pub(crate) struct SessionsArgs {
    pub(crate) test: PathBuf,
    #[arg(long = "config", env = "TESTXML_CONFIG")]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct FormatArgs {
    pub(crate) document: PathBuf,
    #[arg(long = "out", conflicts_with = "check")]
    pub(crate) out: Option<PathBuf>,
    #[arg(long = "check")]
    pub(crate) check: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ValidateDirArgs {
    pub(crate) dir: PathBuf,
    #[arg(long = "schema", env = "TESTXML_SCHEMA")]
    pub(crate) schema: Option<PathBuf>,
}
