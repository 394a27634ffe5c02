//! Error classification command

use colored::*;
use rebound_core::recovery::{ClassifiedError, ErrorClassifier};

use crate::console::CliConsole;

/// Classify an error code and print the verdict
pub fn execute(
    code: &str,
    message: Option<&str>,
    retryable_codes: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let classifier = ErrorClassifier::with_retryable_codes(retryable_codes);
    let classified = classifier.classify(Some(code), message);

    if json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
        return Ok(());
    }

    let console = CliConsole::new();
    console.print_header("Error Classification");
    let extra = extra_codes(&classifier);
    if !extra.is_empty() {
        console.info(&format!("Extra retryable codes: {}", extra.join(", ")));
    }
    println!("{}", verdict(&classified));
    println!();
    println!("{}", classified.format_display());
    Ok(())
}

/// Caller-supplied retryable codes in a stable order
fn extra_codes(classifier: &ErrorClassifier) -> Vec<&str> {
    let mut codes: Vec<&str> = classifier.retryable_codes().collect();
    codes.sort_unstable();
    codes
}

fn verdict(classified: &ClassifiedError) -> String {
    if classified.retryable {
        format!("{} {}", "Retryable:".bold(), "yes".green())
    } else {
        format!("{} {}", "Retryable:".bold(), "no".red())
    }
}
