//! SAMMI Next CLI entry point.

use clap::Parser;
use miette::Result;
use sammi_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        // Help and version exit 0, usage errors exit 1.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        Some(cli::Command::Dev(dev_args)) => commands::dev_execute(dev_args).await,
        Some(cli::Command::Init(init_args)) => commands::init_execute(init_args).await,
        Some(cli::Command::Check(check_args)) => commands::check_execute(check_args).await,
        None => commands::build_execute(args.build).await,
    };

    result.map_err(error::cli_error_to_miette)
}
