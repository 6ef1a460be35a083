//! Fabrix - deployment descriptor compiler and change-impact analyzer.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fabrix::cli::output;
use fabrix::cli::{execute, Cli};
use fabrix::core::constants::LOG_ENV;
use fabrix::error::{ConfigError, CryptoError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("fabrix=debug")
        } else {
            EnvFilter::new("fabrix=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match execute(cli.command) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let suggestion = match &e {
                Error::Crypto(CryptoError::NoKey) => Some(format!(
                    "run: {}",
                    output::cmd("fabrix keygen")
                )),
                Error::Config(ConfigError::AlreadyExists(_)) => Some(format!(
                    "run: {}",
                    output::cmd("fabrix keygen --force")
                )),
                Error::Config(ConfigError::Parse(_)) => {
                    Some("check the syntax of .fabrix.toml".to_string())
                }
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = suggestion {
                output::hint(&hint);
            }
            std::process::exit(1);
        }
    }
}
