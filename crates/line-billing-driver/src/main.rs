//! Line Billing - bills a call-record dataset month by month
//!
//! This is the main entry point for the line-billing driver.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use line_billing_core::format_mills;
use line_billing_driver::{run_dataset, Dataset, DriverConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so a report on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,line_billing=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting line billing");

    let config = DriverConfig::from_env()?;

    tracing::info!(
        dataset_path = %config.dataset_path.display(),
        report_path = ?config.report_path,
        "Driver configuration loaded"
    );

    let dataset = Dataset::load(&config.dataset_path)?;
    let report = run_dataset(&dataset, config.rates)?;

    tracing::info!(
        lines = report.lines.len(),
        grand_total = %format_mills(report.grand_total()),
        "Billing complete"
    );

    report.write_to(config.report_path.as_deref())?;

    Ok(())
}
