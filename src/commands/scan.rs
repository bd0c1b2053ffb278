use crate::cli::Cli;
use crate::services::config::{load_config_file, resolve, ConfigError};
use crate::services::fetch::HttpFetcher;
use crate::services::output::{print_report, write_json_file};
use crate::services::scan::{run_scan, Target};
use std::process::ExitCode;
use tracing::info;

/// Exit status for a target or option the scan refuses to start with.
pub const EXIT_INVALID_INPUT: u8 = 2;

pub fn handle_scan(cli: &Cli) -> anyhow::Result<ExitCode> {
    let target = match Target::parse(&cli.url) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[!] {e}");
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
    };

    let file = load_config_file(cli.config.as_deref())?;
    let settings = match resolve(cli, &file) {
        Ok(s) => s,
        Err(e @ ConfigError::InvalidTimeout(_)) => {
            eprintln!("[!] {e}");
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
        Err(e) => return Err(e.into()),
    };

    let fetcher = HttpFetcher::new(&settings.http)?;
    let report = run_scan(&fetcher, &target, &settings.scan);

    if let Some(path) = &cli.json_out {
        write_json_file(path, &report)?;
        info!(path = %path.display(), "report written");
    }
    print_report(&cli.format, &report)?;
    Ok(ExitCode::SUCCESS)
}
