//! nrc - Entry Point
//!
//! Inspects the client configuration and resolves services the way a running
//! application would.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nrc services` | List configured services and their servers |
//! | `nrc resolve <service>` | Build the service's client and show the chosen server |
//! | `nrc config` | Print the merged configuration as TOML |

use clap::Parser;
use nrc::cli::{Cli, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
