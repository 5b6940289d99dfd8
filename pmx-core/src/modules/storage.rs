use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract;
use crate::types::{Bundle, FilesystemUsage, Issue, Severity, StorageSummary};

/// Signatures of EFI/boot partition corruption left in fsck logs by
/// improper shutdowns
static CORRUPTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"dirty.*corrupt",
        r"boot.*sector.*backup",
        r"Filesystem was changed",
        r"not properly unmounted",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){}", pattern)).unwrap())
    .collect()
});

/// Storage & Filesystem Analyzer
///
/// Checks fsck logs for boot partition corruption, counts storage errors,
/// and flags filesystems running out of space.
pub struct StorageAnalyzer;

impl StorageAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, bundle: &Bundle) -> (StorageSummary, Vec<Issue>) {
        let mut issues = Vec::new();

        // Corruption matches are counted per pattern per line, so a line
        // hitting two signatures counts twice
        let fsck_logs = bundle.output("fsck_logs").unwrap_or("");
        let mut corruption_matches = 0;
        let mut corruption_evidence = Vec::new();
        for pattern in CORRUPTION_PATTERNS.iter() {
            for line in fsck_logs.lines() {
                if !line.starts_with(extract::HEADER_PREFIX) && pattern.is_match(line) {
                    corruption_matches += 1;
                    corruption_evidence.push(line.trim().to_string());
                }
            }
        }
        if corruption_matches > 0 {
            corruption_evidence.truncate(5);
            issues.push(
                Issue::new(
                    Severity::Critical,
                    "storage",
                    "EFI boot partition corruption detected",
                    "Investigate improper shutdowns and repair EFI partition",
                )
                .with_source(extract::command_label(bundle, "fsck_logs"))
                .with_evidence(corruption_evidence),
            );
        }

        let storage_errors_count = extract::count_non_header_lines(bundle, "storage_errors");
        if storage_errors_count > 0 {
            let evidence =
                extract::evidence_lines(bundle.output("storage_errors").unwrap_or(""), 5);
            issues.push(
                Issue::new(
                    Severity::Warning,
                    "storage",
                    format!("Found {} storage-related errors", storage_errors_count),
                    "Check SMART data and hardware connections",
                )
                .with_source(extract::command_label(bundle, "storage_errors"))
                .with_evidence(evidence),
            );
        }

        let mut high_usage_filesystems = Vec::new();
        for line in bundle.output("df_h").unwrap_or("").lines() {
            if !line.contains('%') || line.starts_with(extract::HEADER_PREFIX) {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 5 {
                continue;
            }
            // 5th field is "NN%"; the header row and malformed lines fail
            // to parse and are skipped
            let usage = match parts[4].trim_end_matches('%').parse::<u32>() {
                Ok(usage) => usage,
                Err(_) => continue,
            };
            let filesystem = if parts.len() > 5 { parts[5] } else { parts[0] };

            if usage > 95 {
                high_usage_filesystems.push(FilesystemUsage {
                    filesystem: filesystem.to_string(),
                    usage_percent: usage,
                });
                issues.push(
                    Issue::new(
                        Severity::Critical,
                        "storage",
                        format!("Filesystem {} at {}% capacity", filesystem, usage),
                        format!("Free up space on {} immediately", filesystem),
                    )
                    .with_source(extract::command_label(bundle, "df_h"))
                    .with_evidence(vec![line.trim().to_string()]),
                );
            } else if usage > 85 {
                high_usage_filesystems.push(FilesystemUsage {
                    filesystem: filesystem.to_string(),
                    usage_percent: usage,
                });
                issues.push(
                    Issue::new(
                        Severity::Warning,
                        "storage",
                        format!("Filesystem {} at {}% capacity", filesystem, usage),
                        format!("Monitor and plan cleanup for {}", filesystem),
                    )
                    .with_source(extract::command_label(bundle, "df_h"))
                    .with_evidence(vec![line.trim().to_string()]),
                );
            }
        }

        let summary = StorageSummary {
            efi_corruption_detected: corruption_matches > 0,
            storage_errors_count,
            high_usage_filesystems,
            zfs_available: bundle.has_output("zpool_status"),
            lvm_available: bundle.has_output("pvs"),
        };
        (summary, issues)
    }
}

impl Default for StorageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::CategoryAnalyzer for StorageAnalyzer {
    type Summary = StorageSummary;

    fn analyze(&self, bundle: &Bundle) -> (StorageSummary, Vec<Issue>) {
        self.analyze(bundle)
    }

    fn category(&self) -> &'static str {
        "storage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(outputs: &[(&str, &str)]) -> Bundle {
        let mut bundle = Bundle::default();
        for (key, value) in outputs {
            bundle
                .raw_outputs
                .insert((*key).to_string(), (*value).to_string());
        }
        bundle
    }

    const DF_OUTPUT: &str = "=== Command: df -h ===\n\
Filesystem      Size  Used Avail Use% Mounted on\n\
/dev/sda1        30G   29G  0.5G  97% /\n\
/dev/sdb1       100G   88G   12G  88% /var/lib/vz\n\
/dev/sdc1       200G   80G  120G  40% /backup\n";

    #[test]
    fn full_filesystem_is_critical_with_that_line_as_evidence() {
        let (summary, issues) = StorageAnalyzer::new().analyze(&bundle(&[("df_h", DF_OUTPUT)]));

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].message, "Filesystem / at 97% capacity");
        assert_eq!(
            issues[0].evidence,
            vec!["/dev/sda1        30G   29G  0.5G  97% /".to_string()]
        );
        assert_eq!(issues[0].source_command, "df -h");

        assert_eq!(issues[1].severity, Severity::Warning);
        assert_eq!(issues[1].message, "Filesystem /var/lib/vz at 88% capacity");

        let flagged: Vec<(&str, u32)> = summary
            .high_usage_filesystems
            .iter()
            .map(|fs| (fs.filesystem.as_str(), fs.usage_percent))
            .collect();
        assert_eq!(flagged, vec![("/", 97), ("/var/lib/vz", 88)]);
    }

    #[test]
    fn header_row_and_malformed_lines_are_skipped() {
        let df = "=== Command: df -h ===\nFilesystem Size Used Avail Use% Mounted on\ngarbage 97%\n";
        let (summary, issues) = StorageAnalyzer::new().analyze(&bundle(&[("df_h", df)]));
        assert!(issues.is_empty());
        assert!(summary.high_usage_filesystems.is_empty());
    }

    #[test]
    fn fsck_corruption_patterns_raise_one_critical_issue() {
        let fsck = "=== Command: journalctl -u systemd-fsck@* ===\n\
fsck: 0x41: Dirty bit is set. Fs was not properly unmounted and some data may be corrupt.\n\
fsck: There are differences between boot sector and its backup.\n\
fsck: Filesystem was changed.\n";
        let (summary, issues) = StorageAnalyzer::new().analyze(&bundle(&[("fsck_logs", fsck)]));

        assert!(summary.efi_corruption_detected);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].message, "EFI boot partition corruption detected");
        assert!(!issues[0].evidence.is_empty());
        assert!(issues[0].evidence.len() <= 5);
    }

    #[test]
    fn storage_errors_are_counted_and_warned() {
        let (summary, issues) = StorageAnalyzer::new().analyze(&bundle(&[(
            "storage_errors",
            "=== Command: dmesg | grep -i 'ata\\|scsi' ===\nata1.00: failed command\nsd 0:0:0:0: timeout\n",
        )]));
        assert_eq!(summary.storage_errors_count, 2);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Found 2 storage-related errors");
    }

    #[test]
    fn zfs_and_lvm_availability_follow_key_presence() {
        let (summary, _) =
            StorageAnalyzer::new().analyze(&bundle(&[("zpool_status", "pool: rpool\n")]));
        assert!(summary.zfs_available);
        assert!(!summary.lvm_available);
    }
}
