// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanmail — scan a page, turn it into a PDF, and email it.
//
// Entry point. Initialises logging, reads the environment, starts the scanner
// driver, and hands control to the numbered menu.

mod menu;
mod prompt;
mod selector;
mod session;

use std::process::ExitCode;

use scanmail_core::AppConfig;
use scanmail_core::error::Result;
use scanmail_core::human_errors::humanize_error;
use scanmail_device::{DriverKind, scanner_driver};

use prompt::TerminalPrompter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Scanmail starting");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "scanmail stopped");
            let human = humanize_error(&e);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let kind = DriverKind::from_setting(std::env::var("SCANMAIL_DRIVER").ok().as_deref())?;
    let mut driver = scanner_driver(kind)?;
    tracing::info!(
        backend = driver.backend_name(),
        config = %config.config_path.display(),
        output = %config.output_dir.display(),
        "driver initialised"
    );

    let outcome = menu::run_menu(&config, driver.as_mut(), &mut TerminalPrompter);
    // `exit` is idempotent; a completed session has already called it.
    let released = driver.exit();
    outcome?;
    released
}
