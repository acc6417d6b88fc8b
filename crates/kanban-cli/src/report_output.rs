use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use kanban_activity::Report;
use kanban_core::write_text_atomic;

const STDOUT_DESTINATION: &str = "-";

/// Persists the rendered HTML (or prints it for `-`) and the optional JSON form.
pub fn write_report_outputs(
    report: &Report,
    html_destination: &Path,
    json_destination: Option<&Path>,
    stdout: &mut dyn Write,
) -> Result<()> {
    let html = report.render_html();
    if html_destination.as_os_str() == STDOUT_DESTINATION {
        stdout
            .write_all(html.as_bytes())
            .context("failed to write report to stdout")?;
    } else {
        write_text_atomic(html_destination, &html)?;
        tracing::info!(path = %html_destination.display(), "wrote html report");
    }

    if let Some(json_destination) = json_destination {
        let encoded =
            serde_json::to_string_pretty(report).context("failed to encode report as json")?;
        write_text_atomic(json_destination, &encoded)?;
        tracing::info!(path = %json_destination.display(), "wrote json report");
    }
    Ok(())
}
