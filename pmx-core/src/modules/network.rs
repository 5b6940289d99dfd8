use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract;
use crate::types::{Bundle, Issue, NetworkSummary, Severity};

static INET_ADDR: Lazy<Regex> = Lazy::new(|| Regex::new(r"inet \d+\.\d+\.\d+\.\d+").unwrap());

/// Network Diagnostics Analyzer
///
/// Evaluates the collector's connectivity and DNS smoke tests and counts
/// configured IPv4 interfaces.
pub struct NetworkAnalyzer;

impl NetworkAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (NetworkSummary, Vec<Issue>) {
        let mut issues = Vec::new();

        let ping_test = bundle.output("ping_test");
        let ping_test_success = ping_test
            .map(|output| output.contains("0% packet loss"))
            .unwrap_or(false);
        if let Some(output) = ping_test {
            if !ping_test_success {
                // The verdict is at the end of ping output
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "network",
                        "Internet connectivity test failed",
                        "Check network configuration and routing",
                    )
                    .with_source(extract::command_label(bundle, "ping_test"))
                    .with_evidence(extract::evidence_tail(output, 3)),
                );
            }
        }

        let dns_test = bundle.output("dns_test");
        let dns_test_success = dns_test
            .map(|output| output.contains("Address:"))
            .unwrap_or(false);
        if let Some(output) = dns_test {
            if !dns_test_success {
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "network",
                        "DNS resolution test failed",
                        "Check DNS configuration in /etc/resolv.conf",
                    )
                    .with_source(extract::command_label(bundle, "dns_test"))
                    .with_evidence(extract::evidence_lines(output, 5)),
                );
            }
        }

        let summary = NetworkSummary {
            ping_test_success,
            dns_test_success,
            interface_count: extract::count_pattern_matches(bundle, "ip_addr", &INET_ADDR),
        };
        (summary, issues)
    }
}

impl Default for NetworkAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for NetworkAnalyzer {
    type Summary = NetworkSummary;

    fn analyze(&self, bundle: &Bundle) -> (NetworkSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "network"
    }
}
