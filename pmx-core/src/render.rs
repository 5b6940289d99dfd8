//! Renders a [`Report`] as a short plain-text digest or as a Markdown
//! document with embedded evidence.
//!
//! Rendering is total: absent values print as `unknown` and empty lists
//! collapse to omitted sections, so a partial report never fails to render.

use chrono::SecondsFormat;

use crate::types::{HealthStatus, Issue, Report, ServiceState, Severity};

fn health_indicator(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Critical => "🔴",
        HealthStatus::Degraded | HealthStatus::Warning => "🟠",
        HealthStatus::Healthy => "🟢",
    }
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Unknown")
}

fn kb_to_gb(kb: u64) -> f64 {
    (kb as f64 / 1024.0 / 1024.0 * 100.0).round() / 100.0
}

/// Short fixed-layout digest of the report
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("Proxmox Health Analysis Report\n");
    out.push_str(&format!("Source: {}\n", report.metadata.source_hostname));
    out.push_str(&format!(
        "Analysis Time: {}\n",
        report
            .metadata
            .analysis_timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    out.push_str(&format!(
        "Overall Health: {}\n",
        report.summary.overall_health.as_str().to_uppercase()
    ));
    out.push_str("\nIssue Summary:\n");
    out.push_str(&format!("  Critical: {}\n", report.summary.critical_issues));
    out.push_str(&format!("  Warning:  {}\n", report.summary.warning_issues));
    out.push_str(&format!("  Info:     {}\n", report.summary.info_issues));

    if !report.summary.recommendations.is_empty() {
        out.push_str("\nRecommendations:\n");
        for recommendation in &report.summary.recommendations {
            out.push_str(&format!("  {}\n", recommendation));
        }
    }

    out
}

fn push_issue_group(md: &mut String, heading: &str, issues: &[&Issue]) {
    if issues.is_empty() {
        return;
    }

    md.push_str(&format!("### {}\n\n", heading));
    for (n, issue) in issues.iter().enumerate() {
        md.push_str(&format!("**{}. {}**\n", n + 1, issue.message));
        md.push_str(&format!("   - **Category:** {}\n", issue.category));
        md.push_str(&format!(
            "   - **Recommendation:** {}\n",
            issue.recommendation
        ));
        md.push_str(&format!(
            "   - **Source Command:** `{}`\n",
            issue.source_command
        ));
        if !issue.evidence.is_empty() {
            md.push_str("   - **Evidence:**\n");
            for line in &issue.evidence {
                md.push_str("     ```\n");
                md.push_str(&format!("     {}\n", line));
                md.push_str("     ```\n");
            }
        }
        md.push('\n');
    }
}

/// Full Markdown document: executive summary, grouped issues with
/// evidence, and per-category detail sections
pub fn render_markdown(report: &Report) -> String {
    let mut md = String::new();

    let health = report.summary.overall_health;
    md.push_str(&format!(
        "# Proxmox Health Check Report: {} {}\n\n",
        report.metadata.source_hostname,
        health_indicator(health)
    ));
    md.push_str(&format!(
        "**Generated:** {}\n",
        report
            .metadata
            .analysis_timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    md.push_str(&format!(
        "**Analyzer Version:** {}\n",
        report.metadata.analyzer_version
    ));
    md.push_str(&format!(
        "**Overall Health:** {}\n\n",
        health.as_str().to_uppercase()
    ));

    md.push_str("## Executive Summary\n\n");
    md.push_str("| Category | Count |\n");
    md.push_str("| -------- | ----- |\n");
    md.push_str(&format!(
        "| 🔴 Critical Issues | {} |\n",
        report.summary.critical_issues
    ));
    md.push_str(&format!(
        "| 🟠 Warning Issues | {} |\n",
        report.summary.warning_issues
    ));
    md.push_str(&format!(
        "| 🔵 Info Items | {} |\n",
        report.summary.info_issues
    ));
    md.push_str(&format!(
        "| **Total** | **{}** |\n\n",
        report.summary.total_issues
    ));

    if !report.summary.recommendations.is_empty() {
        md.push_str("### Recommendations\n\n");
        for (n, recommendation) in report.summary.recommendations.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", n + 1, recommendation));
        }
        md.push('\n');
    }

    if !report.issues.is_empty() {
        md.push_str("## Detected Issues\n\n");

        let by_severity = |severity: Severity| -> Vec<&Issue> {
            report
                .issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .collect()
        };
        push_issue_group(&mut md, "🔴 Critical Issues", &by_severity(Severity::Critical));
        push_issue_group(&mut md, "🟠 Warning Issues", &by_severity(Severity::Warning));
        push_issue_group(&mut md, "🔵 Information", &by_severity(Severity::Info));
    }

    md.push_str("## Detailed Analysis\n\n");

    // System overview
    let system = &report.analysis.system_overview;
    md.push_str("### System Overview\n\n");
    md.push_str(&format!(
        "- **Proxmox Version:** {}\n",
        or_unknown(&system.pve_version)
    ));
    md.push_str(&format!(
        "- **Kernel:** {}\n",
        or_unknown(&system.kernel_info)
    ));
    if !system.services.is_empty() {
        md.push_str("\n#### Services Status\n\n");
        md.push_str("| Service | Status |\n");
        md.push_str("| ------- | ------ |\n");
        for (service, state) in &system.services {
            let glyph = match state {
                ServiceState::Running => "✅",
                ServiceState::NotRunning => "❌",
                ServiceState::Unknown => "❓",
            };
            md.push_str(&format!("| {} | {} {} |\n", service, glyph, state.as_str()));
        }
    }
    md.push('\n');

    // Hardware health
    let hardware = &report.analysis.hardware_health;
    md.push_str("### Hardware Health\n\n");
    md.push_str(&format!(
        "**CPU:** {} ({} cores)\n",
        or_unknown(&hardware.cpu.model),
        or_unknown(&hardware.cpu.cores)
    ));
    let total_gb = kb_to_gb(hardware.memory.total_kb.unwrap_or(0));
    let avail_gb = kb_to_gb(hardware.memory.available_kb.unwrap_or(0));
    md.push_str(&format!(
        "**Memory:** {:.2}GB available of {:.2}GB total ({:.1}% used)\n",
        avail_gb, total_gb, hardware.memory.usage_percent
    ));
    if hardware.memory.errors_detected {
        md.push_str("⚠️ **Memory errors detected**\n");
    }
    md.push('\n');

    // Storage and filesystem
    let storage = &report.analysis.storage_filesystem;
    md.push_str("### Storage and Filesystem\n\n");
    if storage.efi_corruption_detected {
        md.push_str("⚠️ **EFI corruption detected**\n");
    }
    if !storage.high_usage_filesystems.is_empty() {
        md.push_str("\n#### High Usage Filesystems\n\n");
        md.push_str("| Filesystem | Usage |\n");
        md.push_str("| ---------- | ----- |\n");
        for fs in &storage.high_usage_filesystems {
            let glyph = if fs.usage_percent > 95 { "🔴" } else { "🟠" };
            md.push_str(&format!(
                "| {} | {} {}% |\n",
                fs.filesystem, glyph, fs.usage_percent
            ));
        }
    }
    md.push_str("\n**Storage Technologies:**\n");
    md.push_str(&format!(
        "- ZFS: {}\n",
        if storage.zfs_available {
            "Available"
        } else {
            "Not available"
        }
    ));
    md.push_str(&format!(
        "- LVM: {}\n\n",
        if storage.lvm_available {
            "Available"
        } else {
            "Not available"
        }
    ));

    // Network diagnostics
    let network = &report.analysis.network_diagnostics;
    md.push_str("### Network Diagnostics\n\n");
    md.push_str("| Test | Status |\n");
    md.push_str("| ---- | ------ |\n");
    md.push_str(&format!(
        "| Internet Connectivity | {} |\n",
        if network.ping_test_success {
            "✅ Success"
        } else {
            "❌ Failed"
        }
    ));
    md.push_str(&format!(
        "| DNS Resolution | {} |\n\n",
        if network.dns_test_success {
            "✅ Success"
        } else {
            "❌ Failed"
        }
    ));
    md.push_str(&format!(
        "**Network Interfaces:** {}\n\n",
        network.interface_count
    ));

    // Virtualization
    let virtualization = &report.analysis.proxmox_virtualization;
    md.push_str("### Virtualization\n\n");
    md.push_str(&format!(
        "**Virtual Machines:** {}\n",
        virtualization.vm_count
    ));
    md.push_str(&format!(
        "**Containers:** {}\n",
        virtualization.container_count
    ));
    md.push_str(&format!(
        "**Cluster:** {}\n\n",
        if virtualization.cluster_available {
            "Available"
        } else {
            "Not available"
        }
    ));

    // Performance
    let performance = &report.analysis.performance_monitoring;
    md.push_str("### Performance\n\n");
    let load = performance.load_average_1min.unwrap_or(0.0);
    let load_glyph = if load > 8.0 {
        "🔴"
    } else if load > 4.0 {
        "🟠"
    } else {
        "🟢"
    };
    md.push_str(&format!("**Load Average:** {} {:.2}\n", load_glyph, load));
    md.push_str(&format!("**Uptime:** {} days\n\n", performance.uptime_days));

    // Security and updates
    let security = &report.analysis.security_updates;
    md.push_str("### Security and Updates\n\n");
    let updates_glyph = if security.security_updates > 0 {
        "🔴"
    } else if security.upgradable_packages > 20 {
        "🟠"
    } else {
        "🟢"
    };
    md.push_str(&format!(
        "**Available Updates:** {} {} packages ({} security updates)\n",
        updates_glyph, security.upgradable_packages, security.security_updates
    ));
    md.push_str(&format!(
        "**SSL Certificate:** {}\n",
        if security.certificate_valid {
            "✅ Valid"
        } else {
            "❌ Expiring or invalid"
        }
    ));
    let login_glyph = if security.failed_logins_count > 10 {
        "🟠"
    } else {
        "🟢"
    };
    md.push_str(&format!(
        "**Failed Logins:** {} {}\n\n",
        login_glyph, security.failed_logins_count
    ));

    md.push_str("---\n");
    md.push_str(&format!(
        "*Report generated by Proxmox Health Check Analyzer v{}*\n",
        report.metadata.analyzer_version
    ));

    md
}
