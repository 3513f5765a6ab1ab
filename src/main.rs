use std::process;

use colored::Colorize;
use pdfops::application::{OutputFormat, Registry};
use pdfops::cli::{Driver, StartupError};
use pdfops::config::Settings;
use pdfops::domain::Taxonomy;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let code = match start() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn start() -> Result<i32, StartupError> {
    Taxonomy::init()?;
    let registry = Registry::new()?;
    let driver = Driver::new(&registry, Settings::load())?;
    Ok(driver.run(setup_logging))
}

/// Install the stderr subscriber; JSON mode keeps stderr quiet.
fn setup_logging(verbosity: u8, format: OutputFormat) {
    let filter = match (format, verbosity) {
        (OutputFormat::Json, _) => LevelFilter::OFF,
        (_, 0) => LevelFilter::WARN,
        (_, 1) => LevelFilter::INFO,
        (_, 2) => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .try_init()
        .ok();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
