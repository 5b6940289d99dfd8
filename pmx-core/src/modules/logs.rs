use crate::extract;
use crate::types::{Bundle, Issue, LogSummary, Severity};

/// Log Analyzer
///
/// Counts recent, boot, and kernel log problems; only a high recent-error
/// count raises an issue.
pub struct LogAnalyzer;

impl LogAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (LogSummary, Vec<Issue>) {
        let mut issues = Vec::new();

        let recent_errors_count = extract::count_non_header_lines(bundle, "recent_errors");
        let boot_issues_count = extract::count_non_header_lines(bundle, "boot_issues");
        let kernel_issues_count = extract::count_non_header_lines(bundle, "kernel_issues");

        if recent_errors_count > 10 {
            let evidence = extract::evidence_lines(bundle.output("recent_errors").unwrap_or(""), 5);
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "logs",
                    format!("High number of recent errors: {}", recent_errors_count),
                    "Review system logs for recurring issues",
                )
                .with_source(extract::command_label(bundle, "recent_errors"))
                .with_evidence(evidence),
            );
        }

        let summary = LogSummary {
            recent_errors_count,
            boot_issues_count,
            kernel_issues_count,
        };
        (summary, issues)
    }
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for LogAnalyzer {
    type Summary = LogSummary;

    fn analyze(&self, bundle: &Bundle) -> (LogSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "logs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_lines(count: usize) -> String {
        let mut output = String::from("=== Command: journalctl -p err --since '24 hours ago' ===\n");
        for n in 0..count {
            output.push_str(&format!("error line {}\n", n));
        }
        output
    }

    #[test]
    fn ten_errors_is_still_quiet() {
        let mut bundle = Bundle::default();
        bundle
            .raw_outputs
            .insert("recent_errors".to_string(), error_lines(10));
        let (summary, issues) = LogAnalyzer::new().analyze(&bundle);
        assert_eq!(summary.recent_errors_count, 10);
        assert!(issues.is_empty());
    }

    #[test]
    fn eleven_errors_warns_with_capped_evidence() {
        let mut bundle = Bundle::default();
        bundle
            .raw_outputs
            .insert("recent_errors".to_string(), error_lines(11));
        let (_, issues) = LogAnalyzer::new().analyze(&bundle);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "High number of recent errors: 11");
        assert_eq!(issues[0].evidence.len(), 5);
    }

    #[test]
    fn boot_and_kernel_counts_are_informational() {
        let mut bundle = Bundle::default();
        bundle
            .raw_outputs
            .insert("boot_issues".to_string(), error_lines(20));
        bundle
            .raw_outputs
            .insert("kernel_issues".to_string(), error_lines(30));
        let (summary, issues) = LogAnalyzer::new().analyze(&bundle);
        assert_eq!(summary.boot_issues_count, 20);
        assert_eq!(summary.kernel_issues_count, 30);
        assert!(issues.is_empty());
    }
}
