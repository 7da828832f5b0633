//! `imagr-validator` - Imagr workflow configuration validator

use clap::Parser;

use imagr_validator::cli::args::{Cli, OutputFormat};
use imagr_validator::cli::commands;
use imagr_validator::error::ExitCode;
use imagr_validator::observability::{LogFormat, init_logging};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::USAGE_ERROR
            } else {
                ExitCode::SUCCESS
            };
            std::process::exit(code);
        }
    };

    if !cli.quiet {
        let format = match cli.log_format {
            OutputFormat::Human => LogFormat::Human,
            OutputFormat::Json => LogFormat::Json,
        };
        init_logging(format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            if !e.is_reported() {
                eprintln!("ERROR: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
