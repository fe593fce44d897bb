use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::RecapError;

lazy_static! {
    // Bash writes HISTTIMEFORMAT stamps as "#<epoch>" on their own lines //
    static ref TIMESTAMP_RE: Regex = Regex::new(r"^#\d+$").unwrap();
}

/// Read a history file into memory. History files are frequently not clean
/// UTF-8, so invalid sequences are replaced rather than treated as fatal.
pub fn load_history(path: &Path) -> Result<String, RecapError> {
    if !path.is_file() {
        return Err(RecapError::Input(format!(
            "{} is not a readable file",
            path.display()
        )));
    }
    let bytes = fs::read(path)
        .map_err(|e| RecapError::Input(format!("could not read {}: {}", path.display(), e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Filter raw history text down to command strings.
///
/// Dropped lines: blank lines, `#<epoch>` timestamp lines, and lines that
/// start with a space (bash's "don't record" convention). Everything else is
/// trimmed and kept verbatim.
pub fn parse_history(history_text: &str) -> Vec<String> {
    let mut commands = Vec::new();

    for line in history_text.lines() {
        if line.starts_with(' ') {
            continue;
        }
        if TIMESTAMP_RE.is_match(line) {
            continue;
        }
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        commands.push(command.to_string());
    }

    commands
}
