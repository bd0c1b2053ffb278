use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "oidc-lint",
    version,
    about = "OAuth/OIDC misconfiguration scanner + passkey readiness"
)]
pub struct Cli {
    #[arg(help = "Issuer URL or app base/login URL")]
    pub url: String,
    #[arg(long, value_name = "PATH", help = "Also write the JSON report to PATH")]
    pub json_out: Option<PathBuf>,
    #[arg(
        long,
        env = "OIDC_LINT_TIMEOUT",
        value_name = "SECONDS",
        help = "HTTP timeout applied to every request [default: 7.0]"
    )]
    pub timeout: Option<f64>,
    #[arg(long, help = "Skip passkey heuristics")]
    pub no_passkey: bool,
    #[arg(
        long,
        env = "OIDC_LINT_CONFIG",
        value_name = "PATH",
        help = "Config file (default: ~/.config/oidc-lint/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, help = "Stdout format")]
    pub format: OutputFormat,
    #[arg(short, long, action = ArgAction::Count, help = "Log more to stderr (-v info, -vv debug)")]
    pub verbose: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
