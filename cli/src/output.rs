use colored::*;
use redact_core::RequestOutcome;
use redact_ime::{Keyboard, Layout, ShiftState, Status, StatusIndicator};
use std::time::Duration;

/// Print the result of a one-shot redaction
pub fn print_outcome(outcome: &RequestOutcome) {
    match outcome {
        Ok(redacted) => println!("{} {}", "Redacted:".green().bold(), redacted),
        Err(failure) => println!(
            "{} [{}] {}",
            "Failed:".red().bold(),
            failure.kind.to_string().yellow(),
            failure.message
        ),
    }
}

pub fn print_check(endpoint: &str, outcome: &RequestOutcome, elapsed: Duration) {
    println!("{} {}", "Endpoint:".cyan(), endpoint);
    println!("{} {} ms", "Latency:".cyan(), elapsed.as_millis());
    print_outcome(outcome);
}

pub fn print_buffer(text: &str) {
    println!("{} {}", "Buffer:".cyan(), text);
}

pub fn print_session_help() {
    println!("{}", "Keyboard session".yellow().bold());
    println!("  Type a line to enter it as text; lines are joined with a space.");
    println!("  {}  redact the text before the cursor", ":redact".green());
    println!("  {}    press Enter (sends the message)", ":send".green());
    println!("  {}    delete one character", ":back".green());
    println!("  {}   wipe the buffer", ":clear".green());
    println!("  {}   shift (twice locks caps)", ":shift".green());
    println!("  {}    switch letters/symbols", ":mode".green());
    println!("  {}    show the buffer", ":show".green());
    println!("  {}    finish the session", ":quit".green());
    println!();
}

pub fn print_keyboard(keyboard: &Keyboard) {
    let layout = match keyboard.layout() {
        Layout::Letters => "letters",
        Layout::Symbols => "symbols",
    };
    let shift = match keyboard.shift() {
        ShiftState::Off => "off",
        ShiftState::Once => "once",
        ShiftState::Locked => "locked",
    };
    println!("{} {} {} {}", "Layout:".cyan(), layout, "Shift:".cyan(), shift);
}

/// Prints status changes as they happen
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl StatusIndicator for TerminalStatus {
    fn show(&mut self, status: Status) {
        let line = status.to_string();
        let line = match status {
            Status::Complete => line.green().bold(),
            Status::Failed(_) | Status::BufferChanged | Status::EditRejected => line.red().bold(),
            Status::Processing => line.cyan(),
            Status::AlreadyProcessing | Status::NothingToRedact => line.yellow(),
        };
        println!("{} {}", "Status:".dimmed(), line);
    }

    fn set_trigger_enabled(&mut self, enabled: bool) {
        tracing::debug!(enabled, "Redact key state changed");
    }
}
