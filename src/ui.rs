//! Output formatting for pipeline logs.
//!
//! Every invocation runs non-interactively inside a CI step, so this module
//! only formats; there are no prompts.

use console::style;

/// Format and print an error message in red to stderr.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning to stderr.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_display_status() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
    }

    #[test]
    fn test_display_warning() {
        // Visual verification test - output is printed to stderr
        display_warning("test warning");
    }
}
