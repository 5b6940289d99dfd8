//! Analysis engine for Proxmox VE health check data.
//!
//! Takes a [`Bundle`] of raw command output captured earlier by a data
//! collector and produces a structured [`Report`]: detected issues with
//! severity, per-category summaries, an overall health verdict, and
//! prioritized recommendations. The engine performs no I/O of its own.

pub mod extract;
pub mod modules;
pub mod render;
pub mod types;

use chrono::{DateTime, Utc};

pub use types::{Bundle, HealthStatus, Issue, Report, Severity};

use types::{Analysis, HealthSummary, ReportMetadata};

/// Main orchestrator: runs every category analyzer over a bundle and
/// assembles the final report.
///
/// Analyzers run in a fixed order (system, hardware, storage, network,
/// virtualization, performance, logs, security) and their issue lists are
/// concatenated in that order, so the report is deterministic for a given
/// bundle and timestamp.
pub struct HealthAnalyzer {
    bundle: Bundle,
}

impl HealthAnalyzer {
    pub fn new(bundle: Bundle) -> Self {
        Self { bundle }
    }

    /// Run the full analysis stamped with the current wall-clock time
    pub fn analyze(&self) -> Report {
        self.analyze_at(Utc::now())
    }

    /// Run the full analysis stamped with a caller-supplied time. Apart
    /// from the timestamp the report is a pure function of the bundle.
    pub fn analyze_at(&self, now: DateTime<Utc>) -> Report {
        let bundle = &self.bundle;
        let mut issues = Vec::new();

        let (system_overview, found) = modules::system::SystemAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (hardware_health, found) = modules::hardware::HardwareAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (storage_filesystem, found) = modules::storage::StorageAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (network_diagnostics, found) = modules::network::NetworkAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (proxmox_virtualization, found) =
            modules::virtualization::VirtualizationAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (performance_monitoring, found) =
            modules::performance::PerformanceAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (log_analysis, found) = modules::logs::LogAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let (security_updates, found) = modules::security::SecurityAnalyzer::new().analyze(bundle);
        issues.extend(found);

        let summary = HealthSummary::tally(&issues);

        Report {
            metadata: ReportMetadata {
                analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
                analysis_timestamp: now,
                source_hostname: bundle.hostname().to_string(),
                source_timestamp: bundle.timestamp().to_string(),
            },
            analysis: Analysis {
                system_overview,
                hardware_health,
                storage_filesystem,
                network_diagnostics,
                proxmox_virtualization,
                performance_monitoring,
                log_analysis,
                security_updates,
            },
            summary,
            issues,
        }
    }
}
