use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract;
use crate::types::{Bundle, CpuSummary, HardwareSummary, Issue, MemorySummary, Severity};

static MEMORY_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)error|corrupt|fail").unwrap());

/// Hardware Health Analyzer
///
/// Examines CPU identification, memory usage, hardware memory errors, and
/// PSI memory pressure.
pub struct HardwareAnalyzer;

impl HardwareAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (HardwareSummary, Vec<Issue>) {
        let mut issues = Vec::new();

        let cpu = CpuSummary {
            model: extract::value_after_colon(bundle, "lscpu", "Model name"),
            cores: extract::value_after_colon(bundle, "lscpu", "CPU(s)"),
        };

        let total_kb = extract::meminfo_value(bundle, "MemTotal");
        let available_kb = extract::meminfo_value(bundle, "MemAvailable");

        // Usage is only computable when both figures were collected
        let mut usage_percent = 0.0;
        if let (Some(total), Some(available)) = (total_kb, available_kb) {
            if total > 0 {
                // Multiply before dividing so round percentages compare
                // exactly against the thresholds
                let raw = (total as f64 - available as f64) * 100.0 / total as f64;
                usage_percent = (raw * 10.0).round() / 10.0;

                let evidence: Vec<String> = bundle
                    .output("meminfo")
                    .unwrap_or("")
                    .lines()
                    .filter(|line| line.contains("Mem") && !line.starts_with(extract::HEADER_PREFIX))
                    .map(|line| line.trim().to_string())
                    .take(5)
                    .collect();

                if raw > 95.0 {
                    issues.push(
                        Issue::new(
                            Severity::Critical,
                            "memory",
                            format!("Memory usage at {:.1}%", raw),
                            "Investigate high memory usage and consider adding RAM",
                        )
                        .with_source(extract::command_label(bundle, "meminfo"))
                        .with_evidence(evidence),
                    );
                } else if raw > 85.0 {
                    issues.push(
                        Issue::new(
                            Severity::Warning,
                            "memory",
                            format!("Memory usage at {:.1}%", raw),
                            "Monitor memory usage trends",
                        )
                        .with_source(extract::command_label(bundle, "meminfo"))
                        .with_evidence(evidence),
                    );
                }
            }
        }

        let memory_errors = extract::count_pattern_matches(bundle, "memory_errors", &MEMORY_ERROR);
        if memory_errors > 0 {
            let evidence: Vec<String> = bundle
                .output("memory_errors")
                .unwrap_or("")
                .lines()
                .filter(|line| {
                    !line.starts_with(extract::HEADER_PREFIX)
                        && !line.trim().is_empty()
                        && MEMORY_ERROR.is_match(line)
                })
                .map(|line| line.trim().to_string())
                .take(5)
                .collect();
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "memory",
                    format!("Found {} memory-related errors", memory_errors),
                    "Check memory hardware and run memory tests",
                )
                .with_source(extract::command_label(bundle, "memory_errors"))
                .with_evidence(evidence),
            );
        }

        // PSI output lines start with "some" or "full"
        if let Some(pressure) = bundle.output("memory_pressure") {
            if pressure.contains("some") || pressure.contains("full") {
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "memory",
                        "Memory pressure detected",
                        "Monitor memory usage and consider optimization",
                    )
                    .with_source(extract::command_label(bundle, "memory_pressure"))
                    .with_evidence(extract::evidence_lines(pressure, 3)),
                );
            }
        }

        let summary = HardwareSummary {
            cpu,
            memory: MemorySummary {
                total_kb,
                available_kb,
                usage_percent,
                errors_detected: memory_errors > 0,
            },
        };
        (summary, issues)
    }
}

impl Default for HardwareAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for HardwareAnalyzer {
    type Summary = HardwareSummary;

    fn analyze(&self, bundle: &Bundle) -> (HardwareSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "hardware"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meminfo_bundle(total: u64, available: u64) -> Bundle {
        let mut bundle = Bundle::default();
        bundle.raw_outputs.insert(
            "meminfo".to_string(),
            format!(
                "=== Command: cat /proc/meminfo ===\nMemTotal:       {} kB\nMemAvailable:   {} kB\n",
                total, available
            ),
        );
        bundle
    }

    #[test]
    fn boundary_85_percent_raises_nothing() {
        // Exactly 85.0% used: strict > comparison, no issue
        let (summary, issues) = HardwareAnalyzer::new().analyze(&meminfo_bundle(1000000, 150000));
        assert!(issues.is_empty());
        assert_eq!(summary.memory.usage_percent, 85.0);
    }

    #[test]
    fn just_over_85_percent_is_a_warning() {
        let (_, issues) = HardwareAnalyzer::new().analyze(&meminfo_bundle(1000000, 149000));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].message, "Memory usage at 85.1%");
    }

    #[test]
    fn just_over_95_percent_is_critical_only() {
        let (_, issues) = HardwareAnalyzer::new().analyze(&meminfo_bundle(1000000, 49000));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].message, "Memory usage at 95.1%");
    }

    #[test]
    fn missing_meminfo_skips_usage_check() {
        let (summary, issues) = HardwareAnalyzer::new().analyze(&Bundle::default());
        assert!(issues.is_empty());
        assert_eq!(summary.memory.usage_percent, 0.0);
        assert_eq!(summary.memory.total_kb, None);
    }

    #[test]
    fn memory_errors_and_pressure_are_warnings() {
        let mut bundle = meminfo_bundle(1000000, 500000);
        bundle.raw_outputs.insert(
            "memory_errors".to_string(),
            "=== Command: journalctl -k ===\nEDAC MC0: CE memory error\nmce: hardware fail\n".to_string(),
        );
        bundle.raw_outputs.insert(
            "memory_pressure".to_string(),
            "=== Command: cat /proc/pressure/memory ===\nsome avg10=2.04 avg60=1.15\n".to_string(),
        );

        let (summary, issues) = HardwareAnalyzer::new().analyze(&bundle);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "Found 2 memory-related errors");
        assert_eq!(issues[1].message, "Memory pressure detected");
        assert!(summary.memory.errors_detected);
    }

    #[test]
    fn cpu_facts_come_from_lscpu() {
        let mut bundle = Bundle::default();
        bundle.raw_outputs.insert(
            "lscpu".to_string(),
            "=== Command: lscpu ===\nModel name:   AMD EPYC 7302P\nCPU(s):       16\n".to_string(),
        );
        let (summary, _) = HardwareAnalyzer::new().analyze(&bundle);
        assert_eq!(summary.cpu.model.as_deref(), Some("AMD EPYC 7302P"));
        assert_eq!(summary.cpu.cores.as_deref(), Some("16"));
    }
}
