mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cfops_core::CloudFoundryOperations;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `-v` raises cfops' own crates first; `RUST_LOG` overrides everything.
fn init_tracing(verbosity: u8) {
    let directives = match verbosity {
        0 => "warn",
        1 => "warn,cfops=info,cfops_core=info",
        2 => "info,cfops=debug,cfops_core=debug,cfops_api=debug",
        _ => "debug,cfops=trace,cfops_core=trace,cfops_api=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "cfops",
                &mut std::io::stdout(),
            );
            Ok(())
        }

        cmd => {
            let mut global = cli.global;
            let cfg = config::load_config_or_default();
            global.output = Some(config::output_format(
                global.output.as_ref(),
                &cfg.defaults,
            )?);

            let ops = connect(&global, &cfg).await?;
            cancel_on_interrupt(ops.cancel_token().clone());

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &ops, &global).await
        }
    }
}

/// Resolve the active profile against the flags and target the session.
async fn connect(global: &GlobalOpts, cfg: &Config) -> Result<CloudFoundryOperations, CliError> {
    let ops_config = config::build_operations_config(global, cfg)?;
    Ok(CloudFoundryOperations::connect(ops_config).await?)
}

/// Ctrl-C cancels in-flight requests and job polling; the operation then
/// fails with `Cancelled`.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            token.cancel();
        }
    });
}
