//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{IntentBotArgs, OutputFormat};
use crate::conversation::EvaluationReport;
use crate::error::Result;
use crate::ml::intent::{IntentCatalog, IntentKind};

/// Summary of a validated intents file.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub intents: usize,
    pub examples: usize,
    pub labels: Vec<u32>,
    pub feedback_yes: Option<u32>,
    pub feedback_no: Option<u32>,
}

impl From<&IntentCatalog> for CatalogSummary {
    fn from(catalog: &IntentCatalog) -> Self {
        Self {
            intents: catalog.len(),
            examples: catalog.example_count(),
            labels: catalog.iter().map(|intent| intent.label()).collect(),
            feedback_yes: catalog
                .find_kind(IntentKind::FeedbackYes)
                .map(|intent| intent.label()),
            feedback_no: catalog
                .find_kind(IntentKind::FeedbackNo)
                .map(|intent| intent.label()),
        }
    }
}

/// One answered question.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResult {
    pub user: String,
    pub question: String,
    pub response: String,
}

/// Result structure for the evaluate command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub examples: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub training_ms: u64,
}

impl EvaluationResult {
    pub fn new(report: EvaluationReport, training_ms: u64) -> Self {
        Self {
            examples: report.examples,
            correct: report.correct,
            accuracy: report.accuracy(),
            training_ms,
        }
    }
}

/// Output a result in the format selected on the command line.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &IntentBotArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &IntentBotArgs) -> Result<()> {
    if args.verbosity() > 0 && !message.is_empty() {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(&val));
            }
        }
        other => println!("{}", format_value(&other)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &IntentBotArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human display.
pub fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.3}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::intent::Intent;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("hello")), "hello");
        assert_eq!(format_value(&json!(null)), "-");
        assert_eq!(format_value(&json!([1, 2, 3])), "1, 2, 3");
        assert_eq!(format_value(&json!(0.5)), "0.500");
        assert_eq!(format_value(&json!(7)), "7");
        assert_eq!(format_value(&json!(true)), "true");
    }

    #[test]
    fn test_catalog_summary() {
        let catalog = IntentCatalog::new(vec![
            Intent::normal(0, "a", &["x", "y"]),
            Intent::feedback_yes(1, "b", &["yes"]),
        ])
        .unwrap();
        let summary = CatalogSummary::from(&catalog);

        assert_eq!(summary.intents, 2);
        assert_eq!(summary.examples, 3);
        assert_eq!(summary.labels, vec![0, 1]);
        assert_eq!(summary.feedback_yes, Some(1));
        assert_eq!(summary.feedback_no, None);
    }

    #[test]
    fn test_evaluation_result() {
        let result = EvaluationResult::new(
            EvaluationReport {
                examples: 4,
                correct: 3,
            },
            12,
        );
        assert_eq!(result.accuracy, 0.75);
    }
}
