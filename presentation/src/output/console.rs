//! Console output formatter for consensus results

use crate::output::verdict::VerdictRenderer;
use colored::Colorize;
use triplet_domain::{ConsensusResult, ProviderResult};

/// Formats consensus results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Every provider answer, then the verdict
    pub fn format(question: &str, result: &ConsensusResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Triplet Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Question:".cyan().bold(), question));

        let ids: Vec<String> = result.provider_ids().map(|p| p.display_name()).collect();
        output.push_str(&format!(
            "{} {}\n",
            "Providers:".cyan().bold(),
            ids.join(", ")
        ));

        output.push_str(&Self::section_header("Responses"));
        for response in result.results() {
            output.push_str(&Self::format_provider(response));
        }

        if let Some(report) = result.verdict() {
            output.push_str(&Self::section_header("Verdict"));
            output.push('\n');
            output.push_str(&VerdictRenderer::render(report));
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{}\n",
            format!("Total time: {:.2}s", result.total_elapsed_ms() as f64 / 1000.0).dimmed()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Verdict only (concise output)
    pub fn format_verdict_only(result: &ConsensusResult) -> String {
        match result.verdict() {
            Some(report) => format!("{}\n", VerdictRenderer::render(report)),
            None => String::new(),
        }
    }

    fn format_provider(response: &ProviderResult) -> String {
        let name = response.provider_id().display_name();
        if response.is_error() {
            format!(
                "\n{}\n{}\n",
                format!("── {} ──", name).red().bold(),
                response.text().red()
            )
        } else {
            format!(
                "\n{} {}\n{}\n",
                format!("── {} ──", name).yellow().bold(),
                format!("({:.2}s)", response.elapsed_seconds()).dimmed(),
                response.text()
            )
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}
