use crate::types::{Bundle, Issue, VirtualizationSummary};

/// Virtualization Inventory Analyzer
///
/// Counts VMs and containers from the guest listings. Purely descriptive;
/// never raises issues.
pub struct VirtualizationAnalyzer;

impl VirtualizationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Guest listing rows carry a status column of "running" or "stopped"
    fn count_guest_lines(output: &str) -> usize {
        output
            .lines()
            .filter(|line| line.contains("running") || line.contains("stopped"))
            .count()
    }

    pub fn analyze(&self, bundle: &Bundle) -> (VirtualizationSummary, Vec<Issue>) {
        let summary = VirtualizationSummary {
            vm_count: bundle
                .output("qm_list")
                .map(Self::count_guest_lines)
                .unwrap_or(0),
            container_count: bundle
                .output("pct_list")
                .map(Self::count_guest_lines)
                .unwrap_or(0),
            cluster_available: bundle.has_output("pvecm_status"),
        };
        (summary, Vec::new())
    }
}

impl Default for VirtualizationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for VirtualizationAnalyzer {
    type Summary = VirtualizationSummary;

    fn analyze(&self, bundle: &Bundle) -> (VirtualizationSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "virtualization"
    }
}
