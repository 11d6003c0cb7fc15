//! One-shot summary command: a single refresh cycle.

use chrono::Local;
use tracing::info;

use bundlewatch_config::Settings;
use bundlewatch_core::compile_summary;

use crate::cli::GlobalOpts;
use crate::commands::refresh::Collaborators;
use crate::error::CliError;
use crate::output;

pub async fn handle(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let collaborators = Collaborators::new(settings)?;

    let record = collaborators.fetch_balances().await?;
    let usage_text = collaborators.fetch_usage().await?;

    info!("Compiling summary");
    let now = Local::now();
    let summary = compile_summary(&record, &usage_text, &now)?;

    info!("Audit: {}", summary.audit_line());

    let color = output::should_color(&global.color);
    let rendered = output::render_summary(&summary, &global.output, color);
    output::print_output(&rendered, global.quiet);
    Ok(())
}
