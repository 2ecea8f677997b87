//! Terminal output for the CLI
//!
//! Status helpers print the wizard and summary messages. The bootstrap log
//! view goes through [`format_log_line`]: engine progress in cyan, command
//! stdout as-is, stderr and failure lines in red with the `ERR: ` marker kept
//! so the text still reads correctly when colours are off.

use bootstrapme_core::engine::{LogLine, LogSource};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Whether a log line should be highlighted as an error
pub fn is_error_line(line: &LogLine) -> bool {
    match line.source {
        LogSource::Stderr => true,
        LogSource::Info => {
            line.text.starts_with("Error") || line.text.starts_with("Command failed")
        }
        LogSource::Stdout => false,
    }
}

/// Render a log line for the terminal
pub fn format_log_line(line: &LogLine) -> String {
    let text = line.to_string();
    if is_error_line(line) {
        style(text).red().to_string()
    } else if line.source == LogSource::Info {
        style(text).cyan().to_string()
    } else {
        text
    }
}
