//! Helpers for pulling scalars out of loosely structured command output.
//!
//! Captured outputs conventionally begin with a `=== Command: <cmd> ===`
//! header line followed by the command's stdout. All functions here are
//! total: a missing key or malformed text degrades to `None`/`0`/empty,
//! never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Bundle;

/// Prefix of the header marker lines embedded in captured output
pub const HEADER_PREFIX: &str = "===";

static COMMAND_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=== Command: (.+?) ===").unwrap());

fn is_content_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with(HEADER_PREFIX)
}

/// First non-empty line of the named output that is not a header marker
pub fn first_line(bundle: &Bundle, key: &str) -> Option<String> {
    bundle
        .output(key)?
        .lines()
        .find(|line| is_content_line(line))
        .map(|line| line.trim().to_string())
}

/// Trimmed text after the first colon on the first line containing both
/// `label` and a colon
pub fn value_after_colon(bundle: &Bundle, key: &str, label: &str) -> Option<String> {
    for line in bundle.output(key)?.lines() {
        if line.contains(label) {
            if let Some((_, value)) = line.split_once(':') {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Kilobyte figure for a field of the dedicated `meminfo` output, parsed
/// from the second whitespace-delimited token of the line starting with
/// `field`
pub fn meminfo_value(bundle: &Bundle, field: &str) -> Option<u64> {
    for line in bundle.output("meminfo")?.lines() {
        if line.starts_with(field) {
            if let Some(value) = line
                .split_whitespace()
                .nth(1)
                .and_then(|token| token.parse().ok())
            {
                return Some(value);
            }
        }
    }
    None
}

/// Number of non-empty lines in the named output, header markers excluded
pub fn count_non_header_lines(bundle: &Bundle, key: &str) -> usize {
    bundle
        .output(key)
        .map(|text| text.lines().filter(|line| is_content_line(line)).count())
        .unwrap_or(0)
}

/// Number of matches of `pattern` across the full text of the named output.
/// Callers compile patterns case-insensitively.
pub fn count_pattern_matches(bundle: &Bundle, key: &str, pattern: &Regex) -> usize {
    bundle
        .output(key)
        .map(|text| pattern.find_iter(text).count())
        .unwrap_or(0)
}

/// The literal command string from the output's header marker, or the key
/// itself when no marker is present
pub fn command_label(bundle: &Bundle, key: &str) -> String {
    bundle
        .output(key)
        .and_then(|text| COMMAND_HEADER.captures(text))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Up to `limit` trimmed content lines of `text`, suitable as issue
/// evidence. Header markers never appear in evidence.
pub fn evidence_lines(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .filter(|line| is_content_line(line))
        .map(|line| line.trim().to_string())
        .take(limit)
        .collect()
}

/// Like [`evidence_lines`], but keeps the last `limit` content lines
/// (useful for command output that ends with a result summary)
pub fn evidence_tail(text: &str, limit: usize) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .filter(|line| is_content_line(line))
        .map(|line| line.trim().to_string())
        .collect();
    let skip = lines.len().saturating_sub(limit);
    lines.into_iter().skip(skip).collect()
}
