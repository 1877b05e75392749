use console::style;
use git_tracking::domain::SemanticVersion;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a warning with a yellow marker.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print a value on its own line so scripts can capture it.
pub fn display_value(value: &str) {
    println!("{}", value);
}

/// Show the detected tool version against the configured floor.
pub fn display_version_check(current: Option<&SemanticVersion>, required: &SemanticVersion) {
    match current {
        Some(version) if required.is_met_by(version) => {
            display_success(&format!("{} (requires {})", version, required));
        }
        Some(version) => {
            display_error(&format!("{} does not satisfy {}", version, required));
        }
        None => {
            display_error(&format!("Could not determine version, need {}", required));
        }
    }
}
