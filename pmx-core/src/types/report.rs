use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Issue, Severity};

/// Metadata stamped onto every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub analyzer_version: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub source_hostname: String,
    pub source_timestamp: String,
}

/// Observed state of a monitored service unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Running,
    NotRunning,
    /// Status output was not collected for this unit
    Unknown,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Running => "running",
            ServiceState::NotRunning => "not_running",
            ServiceState::Unknown => "unknown",
        }
    }
}

/// Facts derived by the system overview analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub pve_version: Option<String>,
    pub kernel_info: Option<String>,
    pub boot_errors_count: usize,
    pub services: BTreeMap<String, ServiceState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSummary {
    pub model: Option<String>,
    pub cores: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySummary {
    pub total_kb: Option<u64>,
    pub available_kb: Option<u64>,
    /// Rounded to one decimal place; 0 when totals were not available
    pub usage_percent: f64,
    pub errors_detected: bool,
}

/// Facts derived by the hardware health analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareSummary {
    pub cpu: CpuSummary,
    pub memory: MemorySummary,
}

/// One filesystem above the usage warning threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesystemUsage {
    pub filesystem: String,
    pub usage_percent: u32,
}

/// Facts derived by the storage/filesystem analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSummary {
    pub efi_corruption_detected: bool,
    pub storage_errors_count: usize,
    pub high_usage_filesystems: Vec<FilesystemUsage>,
    pub zfs_available: bool,
    pub lvm_available: bool,
}

/// Facts derived by the network diagnostics analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub ping_test_success: bool,
    pub dns_test_success: bool,
    pub interface_count: usize,
}

/// Facts derived by the virtualization inventory analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualizationSummary {
    pub vm_count: usize,
    pub container_count: usize,
    pub cluster_available: bool,
}

/// Facts derived by the performance analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub load_average_1min: Option<f64>,
    pub uptime_days: u64,
}

/// Facts derived by the log analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub recent_errors_count: usize,
    pub boot_issues_count: usize,
    pub kernel_issues_count: usize,
}

/// Facts derived by the security/updates analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub upgradable_packages: usize,
    pub security_updates: usize,
    pub certificate_valid: bool,
    pub failed_logins_count: usize,
}

/// Per-category summaries, present for every category even when the
/// underlying raw output was never collected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub system_overview: SystemSummary,
    pub hardware_health: HardwareSummary,
    pub storage_filesystem: StorageSummary,
    pub network_diagnostics: NetworkSummary,
    pub proxmox_virtualization: VirtualizationSummary,
    pub performance_monitoring: PerformanceSummary,
    pub log_analysis: LogSummary,
    pub security_updates: SecuritySummary,
}

/// Overall health verdict derived from the issue collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Critical,
    Degraded,
    Warning,
    Healthy,
}

impl HealthStatus {
    /// Strict priority ladder: any critical issue dominates regardless of
    /// warning volume.
    pub fn from_counts(critical: usize, warning: usize) -> Self {
        if critical > 0 {
            HealthStatus::Critical
        } else if warning > 3 {
            HealthStatus::Degraded
        } else if warning > 0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "critical",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Warning => "warning",
            HealthStatus::Healthy => "healthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue counts, overall verdict, and prioritized recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,
    pub overall_health: HealthStatus,
    pub recommendations: Vec<String>,
}

impl HealthSummary {
    /// Derive the summary from the accumulated issue list. This is the only
    /// constructor, so the counts always agree with the issue list.
    pub fn tally(issues: &[Issue]) -> Self {
        let critical_issues = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        let warning_issues = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count();
        let info_issues = issues
            .iter()
            .filter(|i| i.severity == Severity::Info)
            .count();

        Self {
            total_issues: issues.len(),
            critical_issues,
            warning_issues,
            info_issues,
            overall_health: HealthStatus::from_counts(critical_issues, warning_issues),
            recommendations: Self::build_recommendations(issues),
        }
    }

    /// Prioritized, capped recommendation list: critical recommendations
    /// first (at most 5, in issue order), then warnings (at most 5). Info
    /// issues never contribute.
    fn build_recommendations(issues: &[Issue]) -> Vec<String> {
        let mut recommendations = Vec::new();

        let critical: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .collect();
        if !critical.is_empty() {
            recommendations.push("CRITICAL: Address the following issues immediately:".to_string());
            for issue in critical.iter().take(5) {
                recommendations.push(format!("  - {}", issue.recommendation));
            }
        }

        let warning: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        if !warning.is_empty() {
            recommendations
                .push("WARNING: Address these issues during next maintenance:".to_string());
            for issue in warning.iter().take(5) {
                recommendations.push(format!("  - {}", issue.recommendation));
            }
        }

        if critical.is_empty() && warning.is_empty() {
            recommendations.push("System appears healthy - continue regular monitoring".to_string());
        }

        recommendations
    }
}

/// Complete health analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub analysis: Analysis,
    pub summary: HealthSummary,
    pub issues: Vec<Issue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity, recommendation: &str) -> Issue {
        Issue::new(severity, "test", "message", recommendation)
    }

    #[test]
    fn health_ladder() {
        assert_eq!(HealthStatus::from_counts(1, 0), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_counts(1, 10), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_counts(0, 4), HealthStatus::Degraded);
        assert_eq!(HealthStatus::from_counts(0, 3), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_counts(0, 1), HealthStatus::Warning);
        assert_eq!(HealthStatus::from_counts(0, 0), HealthStatus::Healthy);
    }

    #[test]
    fn tally_counts_are_consistent() {
        let issues = vec![
            issue(Severity::Critical, "a"),
            issue(Severity::Warning, "b"),
            issue(Severity::Warning, "c"),
            issue(Severity::Info, "d"),
        ];
        let summary = HealthSummary::tally(&issues);
        assert_eq!(summary.total_issues, 4);
        assert_eq!(summary.critical_issues, 1);
        assert_eq!(summary.warning_issues, 2);
        assert_eq!(summary.info_issues, 1);
        assert_eq!(
            summary.total_issues,
            summary.critical_issues + summary.warning_issues + summary.info_issues
        );
        assert_eq!(summary.overall_health, HealthStatus::Critical);
    }

    #[test]
    fn info_issues_do_not_affect_health() {
        let issues = vec![issue(Severity::Info, "a"), issue(Severity::Info, "b")];
        let summary = HealthSummary::tally(&issues);
        assert_eq!(summary.overall_health, HealthStatus::Healthy);
        assert_eq!(
            summary.recommendations,
            vec!["System appears healthy - continue regular monitoring".to_string()]
        );
    }

    #[test]
    fn recommendations_are_capped_at_five_per_class() {
        let mut issues = Vec::new();
        for n in 0..7 {
            issues.push(issue(Severity::Critical, &format!("crit-{}", n)));
        }
        for n in 0..6 {
            issues.push(issue(Severity::Warning, &format!("warn-{}", n)));
        }

        let recs = HealthSummary::tally(&issues).recommendations;
        assert_eq!(recs.len(), 12);
        assert_eq!(recs[0], "CRITICAL: Address the following issues immediately:");
        assert_eq!(recs[1], "  - crit-0");
        assert_eq!(recs[5], "  - crit-4");
        assert_eq!(recs[6], "WARNING: Address these issues during next maintenance:");
        assert_eq!(recs[7], "  - warn-0");
        assert_eq!(recs[11], "  - warn-4");
    }

    #[test]
    fn warning_only_recommendations_skip_critical_header() {
        let issues = vec![issue(Severity::Warning, "check disks")];
        let recs = HealthSummary::tally(&issues).recommendations;
        assert_eq!(
            recs,
            vec![
                "WARNING: Address these issues during next maintenance:".to_string(),
                "  - check disks".to_string(),
            ]
        );
    }
}
