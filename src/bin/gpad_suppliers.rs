use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gpad_suppliers::app::App;
use gpad_suppliers::config::{ConfigLoader, Overrides};
use gpad_suppliers::domain::IsoMonth;
use gpad_suppliers::output::{JsonOutput, OutputMode, SummaryOutput};
use gpad_suppliers::portal::PortalHttpClient;

#[derive(Parser)]
#[command(name = "gpad-suppliers")]
#[command(about = "Download the Appointments in General Practice data and extract GP appointment system suppliers")]
#[command(version, author)]
struct Cli {
    /// The month to download the data for (e.g. 2025-01); defaults to the previous month
    #[arg(long)]
    month: Option<String>,

    /// Archive URL or local path to use instead of scraping the publication page
    #[arg(long)]
    zip_file: Option<String>,

    /// JSON config file (defaults to gpad-suppliers.json when present)
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    #[arg(long)]
    output: Option<Utf8PathBuf>,

    #[arg(long)]
    tmp_dir: Option<Utf8PathBuf>,

    /// Leave the downloaded archive and extracted files in place
    #[arg(long)]
    keep_tmp: bool,

    /// Warn when the data file header does not match the expected columns
    #[arg(long)]
    check_header: bool,

    /// Print the run result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Summary
    };

    let month = match cli.month.as_deref() {
        Some(value) => value.parse::<IsoMonth>().into_diagnostic()?,
        None => IsoMonth::previous(chrono::Local::now().date_naive()),
    };

    let settings = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;
    let settings = ConfigLoader::apply_overrides(
        settings,
        Overrides {
            output: cli.output,
            tmp_dir: cli.tmp_dir,
            check_header: cli.check_header,
            keep_tmp: cli.keep_tmp,
        },
    );

    let portal = PortalHttpClient::new(settings.timeout_secs).into_diagnostic()?;
    let app = App::new(settings, portal);
    let result = app.run(month, cli.zip_file.as_deref()).into_diagnostic()?;

    match output_mode {
        OutputMode::Json => JsonOutput::print_run(&result).into_diagnostic()?,
        OutputMode::Summary => SummaryOutput::print_run(&result).into_diagnostic()?,
    }
    Ok(())
}
