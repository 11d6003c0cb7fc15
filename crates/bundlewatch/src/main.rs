mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bundlewatch_config::Settings;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a carrier connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "bundlewatch", &mut std::io::stdout());
            Ok(())
        }

        Command::Summary => {
            let settings = load_settings(&cli.global)?;
            commands::summary::handle(&settings, &cli.global).await
        }

        Command::Watch(args) => {
            let settings = load_settings(&cli.global)?;
            commands::watch::handle(&settings, args, &cli.global).await
        }
    }
}

/// Load and validate the config file named by `--config` (or the
/// platform default location).
fn load_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(bundlewatch_config::default_config_path);

    if !path.exists() {
        return Err(CliError::NoConfig {
            path: path.display().to_string(),
        });
    }

    let settings = bundlewatch_config::Config::load(&path)?.resolve()?;

    // The password stays inside its SecretString; log a mask only.
    tracing::debug!(
        username = settings.username,
        msisdn = settings.msisdn,
        host = %settings.host,
        password = "**********",
        "configuration loaded"
    );

    Ok(settings)
}
