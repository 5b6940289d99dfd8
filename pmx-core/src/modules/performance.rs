use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract;
use crate::types::{Bundle, Issue, PerformanceSummary, Severity};

static UPTIME_DAYS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) days").unwrap());

/// Performance Analyzer
///
/// Evaluates the 1-minute load average against fixed thresholds and
/// extracts the uptime in days.
pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (PerformanceSummary, Vec<Issue>) {
        let mut issues = Vec::new();

        let load_line = extract::first_line(bundle, "loadavg");
        let load_average_1min = load_line.as_deref().and_then(|line| {
            line.split_whitespace()
                .next()
                .and_then(|token| token.parse::<f64>().ok())
        });

        if let (Some(load), Some(line)) = (load_average_1min, &load_line) {
            if load > 8.0 {
                issues.push(
                    Issue::new(
                        Severity::Critical,
                        "performance",
                        format!("High system load: {:.1}", load),
                        "Investigate high CPU usage and resource contention",
                    )
                    .with_source(extract::command_label(bundle, "loadavg"))
                    .with_evidence(vec![line.clone()]),
                );
            } else if load > 4.0 {
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "performance",
                        format!("Elevated system load: {:.1}", load),
                        "Monitor system load trends",
                    )
                    .with_source(extract::command_label(bundle, "loadavg"))
                    .with_evidence(vec![line.clone()]),
                );
            }
        }

        let uptime_days = bundle
            .output("uptime")
            .and_then(|output| UPTIME_DAYS.captures(output))
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);

        let summary = PerformanceSummary {
            load_average_1min,
            uptime_days,
        };
        (summary, issues)
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for PerformanceAnalyzer {
    type Summary = PerformanceSummary;

    fn analyze(&self, bundle: &Bundle) -> (PerformanceSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "performance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loadavg_bundle(loadavg: &str, uptime: Option<&str>) -> Bundle {
        let mut bundle = Bundle::default();
        bundle.raw_outputs.insert(
            "loadavg".to_string(),
            format!("=== Command: cat /proc/loadavg ===\n{}\n", loadavg),
        );
        if let Some(uptime) = uptime {
            bundle.raw_outputs.insert(
                "uptime".to_string(),
                format!("=== Command: uptime ===\n{}\n", uptime),
            );
        }
        bundle
    }

    #[test]
    fn high_load_is_critical() {
        let (summary, issues) =
            PerformanceAnalyzer::new().analyze(&loadavg_bundle("9.52 4.20 2.10 3/421 12345", None));
        assert_eq!(summary.load_average_1min, Some(9.52));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].message, "High system load: 9.5");
        assert_eq!(issues[0].evidence, vec!["9.52 4.20 2.10 3/421 12345"]);
    }

    #[test]
    fn elevated_load_is_a_warning() {
        let (_, issues) =
            PerformanceAnalyzer::new().analyze(&loadavg_bundle("5.00 3.00 2.00 1/200 999", None));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].message, "Elevated system load: 5.0");
    }

    #[test]
    fn boundary_load_raises_nothing() {
        // Exactly 4.0: strict > comparison
        let (summary, issues) =
            PerformanceAnalyzer::new().analyze(&loadavg_bundle("4.0 2.00 1.00 1/100 42", None));
        assert!(issues.is_empty());
        assert_eq!(summary.load_average_1min, Some(4.0));
    }

    #[test]
    fn unparseable_load_is_skipped_silently() {
        let (summary, issues) =
            PerformanceAnalyzer::new().analyze(&loadavg_bundle("garbage output", None));
        assert!(issues.is_empty());
        assert_eq!(summary.load_average_1min, None);
    }

    #[test]
    fn uptime_days_are_extracted() {
        let (summary, _) = PerformanceAnalyzer::new().analyze(&loadavg_bundle(
            "0.50 0.40 0.30 1/100 42",
            Some(" 14:11:11 up 231 days,  3:22,  1 user,  load average: 0.50, 0.40, 0.30"),
        ));
        assert_eq!(summary.uptime_days, 231);
    }

    #[test]
    fn missing_uptime_defaults_to_zero() {
        let (summary, _) =
            PerformanceAnalyzer::new().analyze(&loadavg_bundle("0.50 0.40 0.30 1/100 42", None));
        assert_eq!(summary.uptime_days, 0);
    }
}
