// file: src/utils/logging.rs
// description: tracing setup and console rendering for search reports

use crate::pipeline::UsageSummary;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    colored::control::set_override(colored_output);
}

pub fn format_heading(msg: &str) -> String {
    format!("--- {} ---", msg).cyan().bold().to_string()
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// Numbered step of the `verify` checklist
pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

/// Batch dropped under the `skip` failure policy
pub fn format_skipped_batch(batch: usize, error: &str) -> String {
    format_warning(&format!("Batch {} skipped: {}", batch, error))
}

pub fn format_no_matches() -> String {
    format_warning("No users found matching the search criteria.")
}

/// Token usage block printed after every search. Synthesis is the last
/// per-call entry.
pub fn format_usage_summary(summary: &UsageSummary) -> String {
    format!(
        "{}\nTotal tokens used: {}\nNumber of batches processed: {}\nTokens used per batch: {:?}",
        format_heading("Token Usage Summary"),
        summary.total_tokens,
        summary.batch_count,
        summary.batch_tokens
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_usage_summary_lines() {
        colored::control::set_override(false);
        let summary = UsageSummary {
            total_tokens: 350,
            batch_count: 3,
            batch_tokens: vec![120, 110, 120],
        };

        assert_eq!(
            format_usage_summary(&summary),
            "--- Token Usage Summary ---\n\
             Total tokens used: 350\n\
             Number of batches processed: 3\n\
             Tokens used per batch: [120, 110, 120]"
        );
    }

    #[test]
    fn test_skipped_batch_names_index_and_error() {
        colored::control::set_override(false);
        assert_eq!(
            format_skipped_batch(2, "Model call failed: timeout"),
            "⚠ Batch 2 skipped: Model call failed: timeout"
        );
        assert_eq!(
            format_no_matches(),
            "⚠ No users found matching the search criteria."
        );
    }

    #[test]
    fn test_step_counter() {
        colored::control::set_override(false);
        assert_eq!(format_step(2, 3, "Model credentials"), "[2/3] Model credentials");
    }
}
