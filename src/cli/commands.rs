//! Command implementations for the intentbot CLI.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::BotConfig;
use crate::conversation::ConversationEngine;
use crate::ml::intent::IntentCatalog;

/// Line that ends an interactive session.
pub const QUIT_COMMAND: &str = "/quit";

/// Execute a CLI command.
pub fn execute_command(args: IntentBotArgs) -> Result<()> {
    match &args.command {
        Command::Validate(validate_args) => validate_intents(validate_args, &args),
        Command::Ask(ask_args) => ask_question(ask_args, &args),
        Command::Chat(chat_args) => chat(chat_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
    }
}

/// Load the configuration named on the command line, or the defaults.
fn load_config(cli_args: &IntentBotArgs) -> Result<BotConfig> {
    match &cli_args.config {
        Some(path) => BotConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(BotConfig::default()),
    }
}

fn load_catalog(path: &Path) -> Result<IntentCatalog> {
    IntentCatalog::from_json_file(path)
        .with_context(|| format!("failed to load intents from {}", path.display()))
}

/// Build and train an engine; returns it with the training time in ms.
fn trained_engine(intents: &Path, cli_args: &IntentBotArgs) -> Result<(ConversationEngine, u64)> {
    let config = load_config(cli_args)?;
    let catalog = load_catalog(intents)?;
    let mut engine = ConversationEngine::from_config(catalog, &config)?;

    let start = Instant::now();
    engine.train().context("training failed")?;
    Ok((engine, start.elapsed().as_millis() as u64))
}

/// Validate an intents file.
fn validate_intents(args: &ValidateArgs, cli_args: &IntentBotArgs) -> Result<()> {
    load_config(cli_args)?;
    let catalog = load_catalog(&args.intents)?;
    output_result(
        "Intents file is valid",
        &CatalogSummary::from(&catalog),
        cli_args,
    )?;
    Ok(())
}

/// Answer a single question.
fn ask_question(args: &AskArgs, cli_args: &IntentBotArgs) -> Result<()> {
    let (engine, _) = trained_engine(&args.intents, cli_args)?;
    let response = engine.find_response(&args.question, &args.user)?;
    output_result(
        "",
        &AnswerResult {
            user: args.user.clone(),
            question: args.question.clone(),
            response,
        },
        cli_args,
    )?;
    Ok(())
}

/// Answer questions from stdin until EOF or the quit command.
fn chat(args: &ChatArgs, cli_args: &IntentBotArgs) -> Result<()> {
    let (engine, training_ms) = trained_engine(&args.intents, cli_args)?;
    if cli_args.verbosity() > 0 {
        eprintln!("Model trained in {training_ms} ms. Type {QUIT_COMMAND} to leave.");
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let answered = run_chat(&engine, &args.user, stdin.lock(), stdout.lock())?;
    info!("Chat session for {} ended after {answered} questions", args.user);
    Ok(())
}

/// Drive a chat session over arbitrary input and output streams.
///
/// Blank lines are skipped. Returns the number of questions answered.
pub fn run_chat<R: BufRead, W: Write>(
    engine: &ConversationEngine,
    user: &str,
    input: R,
    mut output: W,
) -> Result<usize> {
    let mut answered = 0;
    for line in input.lines() {
        let line = line?;
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == QUIT_COMMAND {
            break;
        }
        let response = engine.find_response(question, user)?;
        writeln!(output, "{response}")?;
        answered += 1;
    }
    output.flush()?;
    Ok(answered)
}

/// Train and report accuracy on the training examples.
fn evaluate(args: &EvaluateArgs, cli_args: &IntentBotArgs) -> Result<()> {
    let (engine, training_ms) = trained_engine(&args.intents, cli_args)?;
    let report = engine.evaluate()?;
    output_result(
        "Training-set evaluation",
        &EvaluationResult::new(report, training_ms),
        cli_args,
    )?;
    Ok(())
}
