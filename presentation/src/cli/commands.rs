//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every provider answer followed by the verdict
    Full,
    /// Only the verdict
    Verdict,
    /// Flat JSON object: `{"gpt": ..., "claude": ..., "verdict": ...}`
    Json,
}

/// CLI arguments for triplet
#[derive(Parser, Debug)]
#[command(name = "triplet")]
#[command(author, version, about = "Ask several LLMs at once and get a blind AI verdict")]
#[command(long_about = r#"
Triplet sends one prompt to several LLM providers concurrently and combines
their answers with a blind verdict.

1. Dispatch: every provider answers in parallel, each with its own fallback chain
2. Verdict: an independent judge scores the answers under anonymous labels
   and writes a synthesized best answer

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./triplet.toml      Project-level config
3. ~/.config/triplet/config.toml   Global config

Example:
  triplet "What is the capital of France?"
  triplet --attach photo.jpg "What is in this picture?"
  triplet --stream --skip-verdict "Summarize the CAP theorem"
  echo '{"prompt": "Hi", "skip_ai_verdict": true}' | triplet --request - --output json
"#)]
pub struct Cli {
    /// The prompt to send (not needed with --request)
    pub question: Option<String>,

    /// Attach a file (images are forwarded to vision-capable models)
    #[arg(short, long, value_name = "FILE")]
    pub attach: Vec<PathBuf>,

    /// Read a JSON request (`{"prompt", "attachments", "skip_ai_verdict"}`) from a file, or `-` for stdin
    #[arg(long, value_name = "PATH", conflicts_with = "question")]
    pub request: Option<PathBuf>,

    /// Skip the AI verdict and print a comparison stub instead
    #[arg(long)]
    pub skip_verdict: bool,

    /// Emit `data: {...}` frames as providers finish instead of one result
    #[arg(long)]
    pub stream: bool,

    /// Providers to ask, overriding the configured set (can be specified multiple times)
    #[arg(short, long, value_name = "ID")]
    pub provider: Vec<String>,

    /// Output format for batch mode
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append a JSONL transcript of each run to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Also write diagnostic logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_with_attachments() {
        let cli = Cli::parse_from([
            "triplet",
            "--attach",
            "a.png",
            "-a",
            "b.jpg",
            "--skip-verdict",
            "-o",
            "json",
            "What is this?",
        ]);
        assert_eq!(cli.question.as_deref(), Some("What is this?"));
        assert_eq!(cli.attach.len(), 2);
        assert!(cli.skip_verdict);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(!cli.stream);
    }

    #[test]
    fn test_request_conflicts_with_question() {
        let parsed = Cli::try_parse_from(["triplet", "--request", "-", "hello"]);
        assert!(parsed.is_err());

        let cli = Cli::parse_from(["triplet", "--request", "-", "--stream", "-vv"]);
        assert_eq!(cli.request, Some(PathBuf::from("-")));
        assert!(cli.stream);
        assert_eq!(cli.verbose, 2);
    }
}
