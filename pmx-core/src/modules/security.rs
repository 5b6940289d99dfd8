use crate::extract;
use crate::types::{Bundle, Issue, SecuritySummary, Severity};

/// Security & Updates Analyzer
///
/// Checks pending security updates, upgradable package backlog,
/// certificate validity, and failed login volume.
pub struct SecurityAnalyzer;

impl SecurityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (SecuritySummary, Vec<Issue>) {
        let mut issues = Vec::new();

        let security_updates = extract::count_non_header_lines(bundle, "security_updates");
        if security_updates > 0 {
            let evidence =
                extract::evidence_lines(bundle.output("security_updates").unwrap_or(""), 5);
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "security",
                    format!("{} security updates available", security_updates),
                    "Apply security updates as soon as possible",
                )
                .with_source(extract::command_label(bundle, "security_updates"))
                .with_evidence(evidence),
            );
        }

        let upgradable_packages = extract::count_non_header_lines(bundle, "apt_upgradable");
        if upgradable_packages > 20 {
            let evidence =
                extract::evidence_lines(bundle.output("apt_upgradable").unwrap_or(""), 5);
            issues.push(
                Issue::new(
                    Severity::Info,
                    "maintenance",
                    format!("{} packages can be upgraded", upgradable_packages),
                    "Schedule maintenance window for system updates",
                )
                .with_source(extract::command_label(bundle, "apt_upgradable"))
                .with_evidence(evidence),
            );
        }

        let cert_check = bundle.output("cert_check");
        let certificate_valid = cert_check
            .map(|output| output.contains("Certificate will not expire"))
            .unwrap_or(false);
        if let Some(output) = cert_check {
            if !certificate_valid {
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "security",
                        "SSL certificate may be expiring soon",
                        "Check certificate expiration and renew if needed",
                    )
                    .with_source(extract::command_label(bundle, "cert_check"))
                    .with_evidence(extract::evidence_lines(output, 3)),
                );
            }
        }

        let failed_logins_count = extract::count_non_header_lines(bundle, "failed_logins");
        if failed_logins_count > 10 {
            let evidence = extract::evidence_lines(bundle.output("failed_logins").unwrap_or(""), 5);
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "security",
                    format!("High number of failed logins: {}", failed_logins_count),
                    "Review security logs and consider fail2ban",
                )
                .with_source(extract::command_label(bundle, "failed_logins"))
                .with_evidence(evidence),
            );
        }

        let summary = SecuritySummary {
            upgradable_packages,
            security_updates,
            certificate_valid,
            failed_logins_count,
        };
        (summary, issues)
    }
}

impl Default for SecurityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for SecurityAnalyzer {
    type Summary = SecuritySummary;

    fn analyze(&self, bundle: &Bundle) -> (SecuritySummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "security"
    }
}
