use std::collections::BTreeMap;

use crate::extract;
use crate::types::{Bundle, Issue, ServiceState, Severity, SystemSummary};

/// Proxmox service units whose status output the collector captures, keyed
/// by their raw-output identifier
const MONITORED_SERVICES: [&str; 5] = [
    "pve_cluster",
    "pvedaemon",
    "pveproxy",
    "pvestatd",
    "pve_firewall",
];

/// System Overview Analyzer
///
/// Checks boot errors and the status of the core Proxmox services.
pub struct SystemAnalyzer;

impl SystemAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (SystemSummary, Vec<Issue>) {
        let mut issues = Vec::new();

        let pve_version = extract::first_line(bundle, "pveversion");
        let kernel_info = extract::first_line(bundle, "uname");

        let boot_errors_count = extract::count_non_header_lines(bundle, "boot_errors");
        if boot_errors_count > 0 {
            let evidence = extract::evidence_lines(bundle.output("boot_errors").unwrap_or(""), 5);
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "system",
                    format!("Found {} boot errors", boot_errors_count),
                    "Review boot logs and investigate error causes",
                )
                .with_source(extract::command_label(bundle, "boot_errors"))
                .with_evidence(evidence),
            );
        }

        let mut services = BTreeMap::new();
        for service in MONITORED_SERVICES {
            let state = match bundle.output(service) {
                // Status was not collected for this unit
                None => ServiceState::Unknown,
                Some(status) if status.contains("active (running)") => ServiceState::Running,
                Some(status) => {
                    issues.push(
                        Issue::new(
                            Severity::Critical,
                            "services",
                            format!("Service {} is not running", service),
                            format!("Investigate and restart {} service", service),
                        )
                        .with_source(extract::command_label(bundle, service))
                        .with_evidence(extract::evidence_lines(status, 3)),
                    );
                    ServiceState::NotRunning
                }
            };
            services.insert(service.to_string(), state);
        }

        let summary = SystemSummary {
            pve_version,
            kernel_info,
            boot_errors_count,
            services,
        };
        (summary, issues)
    }
}

impl Default for SystemAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for SystemAnalyzer {
    type Summary = SystemSummary;

    fn analyze(&self, bundle: &Bundle) -> (SystemSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "system"
    }
}
