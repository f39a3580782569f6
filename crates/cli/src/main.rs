use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use certcheck_core::config::Config;
use certcheck_core::report::Report;
use certcheck_core::types::Thresholds;
use certcheck_core::{check_dir, CheckOptions};

/// Configuration problems are reported like a CRITICAL check.
const CONFIG_ERROR_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "certcheck",
    version,
    disable_version_flag = true,
    about = "Check certificate expiration dates in a directory",
    long_about = "Searches a directory recursively for files with the given extension, \
                  decodes each one as a PEM certificate and reports when it expires.\n\n\
                  Exit codes follow the monitoring plugin convention: \
                  0 OK, 1 WARNING, 2 CRITICAL.\n\n\
                  Days are counted against the current UTC date."
)]
struct Cli {
    /// Critical if a certificate expires in this many days or fewer (e.g. 10)
    #[arg(short, long, value_name = "DAYS")]
    critical: Option<u32>,

    /// Warning if a certificate expires in fewer than this many days (e.g. 30)
    #[arg(short, long, value_name = "DAYS")]
    warning: Option<u32>,

    /// Directory where certificates are located (e.g. /etc/nginx/ssl)
    #[arg(short, long, value_name = "DIR")]
    path: Option<PathBuf>,

    /// File extension to check (e.g. .cer)
    #[arg(short, long, value_name = "EXT")]
    extension: Option<String>,

    /// TOML file with defaults for the options above
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the status line (text) or the full report (json)
    #[arg(long, value_enum, default_value = "text")]
    output_format: OutputFormat,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

struct Style {
    bold: &'static str,
    red: &'static str,
    reset: &'static str,
}

const COLOR: Style = Style {
    bold: "\x1b[1m",
    red: "\x1b[31m",
    reset: "\x1b[0m",
};

const PLAIN: Style = Style {
    bold: "",
    red: "",
    reset: "",
};

fn style() -> &'static Style {
    if std::env::var_os("NO_COLOR").is_some() {
        &PLAIN
    } else {
        &COLOR
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let res = resolve_options(&cli).and_then(|opts| run_check(&opts, &cli.output_format));

    match res {
        Ok(code) => code,
        Err(e) => {
            let s = style();
            eprintln!(
                "{}{red}error:{reset} {:#}",
                s.bold,
                e,
                red = s.red,
                reset = s.reset
            );
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}

/// Merge command-line flags over the optional config file.
fn resolve_options(cli: &Cli) -> anyhow::Result<CheckOptions> {
    let cfg = match &cli.config {
        Some(p) => Config::load(p).context("load config")?,
        None => Config::default(),
    };

    let warning = cli
        .warning
        .or(cfg.warning)
        .context("missing required option -w/--warning")?;
    let critical = cli
        .critical
        .or(cfg.critical)
        .context("missing required option -c/--critical")?;
    let path = cli
        .path
        .clone()
        .or(cfg.path)
        .context("missing required option -p/--path")?;
    let extension = cli
        .extension
        .clone()
        .or(cfg.extension)
        .context("missing required option -e/--extension")?;

    let thresholds = Thresholds::new(warning, critical);
    if thresholds.is_inverted() {
        warn!(
            warning_days = warning,
            critical_days = critical,
            "critical threshold exceeds warning threshold; WARNING will never be reported"
        );
    }

    Ok(CheckOptions::new(path, extension, thresholds))
}

fn render(report: &Report, format: &OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(report.summary.clone()),
        OutputFormat::Json => report.to_json_line(),
    }
}

fn run_check(opts: &CheckOptions, format: &OutputFormat) -> anyhow::Result<ExitCode> {
    let report = check_dir(opts)?;

    // Exactly one line on stdout; monitoring agents read the exit code.
    println!("{}", render(&report, format)?);

    Ok(ExitCode::from(report.exit_code()))
}
