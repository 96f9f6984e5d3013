//! Helpers shared by the CLI subcommands.

use std::fs;
use std::io::{self, Read};
use std::time::UNIX_EPOCH;

/// Read SVG content from a file path, or from stdin when the path is "-".
pub fn read_svg_input(path: &str) -> Result<String, String> {
    if path == "-" {
        eprintln!("Reading SVG from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        eprintln!("Loading: {}", path);
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))
    }
}

/// Modification time of the input file in seconds since the epoch, falling
/// back to the current time for stdin or unreadable metadata. Recorded in
/// the pretty header's tedit field.
pub fn source_timestamp(path: &str) -> u64 {
    if path != "-" {
        if let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) {
            if let Ok(elapsed) = modified.duration_since(UNIX_EPOCH) {
                return elapsed.as_secs();
            }
        }
    }

    chrono::Local::now().timestamp().max(0) as u64
}
