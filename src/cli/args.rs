//! Command line argument parsing for the intentbot CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// intentbot - answer questions by matching them to predefined intents
#[derive(Parser, Debug, Clone)]
#[command(name = "intentbot")]
#[command(about = "An intent-classification chatbot with a feedback loop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct IntentBotArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Bot configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "INTENTBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl IntentBotArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load and check an intents file
    Validate(ValidateArgs),

    /// Train on an intents file and answer one question
    Ask(AskArgs),

    /// Train on an intents file and answer questions read from stdin
    Chat(ChatArgs),

    /// Train on an intents file and report accuracy on its own examples
    Evaluate(EvaluateArgs),
}

/// Arguments for validating an intents file
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Intents file (JSON array of intent definitions)
    #[arg(value_name = "INTENTS_FILE")]
    pub intents: PathBuf,
}

/// Arguments for a single question
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// Intents file (JSON array of intent definitions)
    #[arg(value_name = "INTENTS_FILE")]
    pub intents: PathBuf,

    /// Question text
    #[arg(value_name = "QUESTION")]
    pub question: String,

    /// User identifier
    #[arg(short, long, default_value = "cli")]
    pub user: String,
}

/// Arguments for an interactive session
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Intents file (JSON array of intent definitions)
    #[arg(value_name = "INTENTS_FILE")]
    pub intents: PathBuf,

    /// User identifier
    #[arg(short, long, default_value = "cli")]
    pub user: String,
}

/// Arguments for evaluating the classifier
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Intents file (JSON array of intent definitions)
    #[arg(value_name = "INTENTS_FILE")]
    pub intents: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_ask_command() {
        let args = IntentBotArgs::try_parse_from([
            "intentbot",
            "ask",
            "intents.json",
            "book a flight",
            "--user",
            "bob",
        ])
        .unwrap();

        if let Command::Ask(ask_args) = args.command {
            assert_eq!(ask_args.intents, PathBuf::from("intents.json"));
            assert_eq!(ask_args.question, "book a flight");
            assert_eq!(ask_args.user, "bob");
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_chat_default_user() {
        let args = IntentBotArgs::try_parse_from(["intentbot", "chat", "intents.json"]).unwrap();

        if let Command::Chat(chat_args) = args.command {
            assert_eq!(chat_args.user, "cli");
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_config_flag() {
        let args = IntentBotArgs::try_parse_from([
            "intentbot",
            "--config",
            "bot.json",
            "evaluate",
            "intents.json",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("bot.json")));
        assert!(matches!(args.command, Command::Evaluate(_)));
    }

    #[test]
    fn test_verbosity_levels() {
        let args = IntentBotArgs::try_parse_from(["intentbot", "validate", "i.json"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = IntentBotArgs::try_parse_from(["intentbot", "-vv", "validate", "i.json"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            IntentBotArgs::try_parse_from(["intentbot", "--quiet", "validate", "i.json"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            IntentBotArgs::try_parse_from(["intentbot", "--format", "json", "validate", "i.json"])
                .unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
