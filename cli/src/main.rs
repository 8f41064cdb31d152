use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use lminfo_lmstat::config::LminfoConfig;
use lminfo_lmstat::extractor::read_captured_output;
use lminfo_lmstat::output::{OutputFormat, format_report};
use lminfo_lmstat::{LminfoError, collect_license_info};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lminfo", version)]
#[command(
    about = "Gets FlexLM license usage data and prints it in a human- and/or machine-readable format"
)]
struct Cli {
    /// License file (or port@host) to query.
    #[arg(long)]
    licfile: Option<String>,
    /// Output format [default: json, or the config file's choice].
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,
    /// Print the lmstat command that gets the raw data, plus debug logs.
    #[arg(long)]
    verbose: bool,
    /// Parse captured lmstat output from this file ("-" for stdin) instead of running lmstat.
    #[arg(long)]
    input: Option<PathBuf>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// lmutil executable.
    #[arg(long)]
    lmutil: Option<String>,
    /// Time allowed for lmstat to answer, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("lminfo: error, {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn run(cli: Cli) -> Result<(), LminfoError> {
    let mut config = match &cli.config {
        Some(path) => LminfoConfig::load(path)?,
        None => LminfoConfig::default(),
    };
    if let Some(lmutil) = cli.lmutil {
        config.lmutil = lmutil;
    }
    if let Some(licfile) = cli.licfile {
        config.licfile = Some(licfile);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    let format = cli.output.unwrap_or(config.output);
    debug!(?config, ?format, "resolved configuration");

    let raw = match &cli.input {
        Some(path) => read_captured_output(path),
        None => config.command().run(),
    };

    let today = chrono::Local::now().date_naive();
    let license_info = collect_license_info(raw, today)?;
    let rendered = format_report(&license_info.report, &license_info.sections, format)
        .map_err(LminfoError::Output)?;

    if rendered.is_empty() || rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}
