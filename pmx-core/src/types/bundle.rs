use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw diagnostic data captured from a host by the collector script.
///
/// `raw_outputs` maps stable command identifiers (e.g., `"meminfo"`,
/// `"df_h"`) to the literal captured text, which conventionally starts with
/// a `=== Command: <cmd> ===` header line. Every section is optional: an
/// absent key means that diagnostic was not collected, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    #[serde(default)]
    pub raw_outputs: BTreeMap<String, String>,
}

impl Bundle {
    /// Look up a raw command output by key
    pub fn output(&self, key: &str) -> Option<&str> {
        self.raw_outputs.get(key).map(String::as_str)
    }

    /// Whether a raw output was collected at all
    pub fn has_output(&self, key: &str) -> bool {
        self.raw_outputs.contains_key(key)
    }

    pub fn hostname(&self) -> &str {
        self.metadata
            .get("hostname")
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    pub fn timestamp(&self) -> &str {
        self.metadata
            .get("timestamp")
            .map(String::as_str)
            .unwrap_or("unknown")
    }
}
