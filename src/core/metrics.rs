//! Usage metrics persisted across CLI invocations.
//!
//! The store is an injected collaborator with an explicit load/save
//! lifecycle. Metrics are best-effort bookkeeping: a missing or corrupt
//! file loads as fresh zeroed metrics, and a failed save is logged at
//! debug level and otherwise ignored.

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// File name of the metrics dotfile, resolved against the working directory
pub const METRICS_FILE: &str = ".scaffex-metrics.json";

/// Cumulative usage counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageMetrics {
    pub total_projects: u64,
    /// Running average in milliseconds
    pub average_generation_time: f64,
    /// Hit rate of the render cache during the most recent run
    pub cache_hit_rate: f64,
    /// RFC 3339 timestamp of the last recorded run, empty when none
    pub last_project_created: String,
    pub templates_used: BTreeMap<String, u64>,
}

/// Load/record/save wrapper around the metrics dotfile
pub struct MetricsStore {
    path: PathBuf,
    metrics: UsageMetrics,
}

impl MetricsStore {
    /// Load metrics from a file, starting fresh if it is missing or corrupt
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let metrics = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!(error = %e, path = %path.display(), "Metrics file is corrupt, starting fresh");
                UsageMetrics::default()
            }),
            Err(_) => UsageMetrics::default(),
        };
        Self { path, metrics }
    }

    /// Load metrics from the dotfile in the current working directory
    pub fn load_default() -> Self {
        Self::load(METRICS_FILE)
    }

    /// Current counters
    pub fn metrics(&self) -> &UsageMetrics {
        &self.metrics
    }

    /// Path this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one completed generation run and persist
    pub fn record_generation(&mut self, template: &str, elapsed: Duration, cache_hit_rate: f64) {
        let m = &mut self.metrics;
        m.total_projects += 1;
        m.last_project_created = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let total_time = m.average_generation_time * (m.total_projects - 1) as f64 + elapsed_ms;
        m.average_generation_time = total_time / m.total_projects as f64;

        m.cache_hit_rate = cache_hit_rate;
        *m.templates_used.entry(template.to_string()).or_insert(0) += 1;

        self.save();
    }

    /// Zero all counters and persist
    pub fn reset(&mut self) {
        self.metrics = UsageMetrics::default();
        self.save();
    }

    fn save(&self) {
        match serde_json::to_string_pretty(&self.metrics) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::debug!(
                        error = %e,
                        path = %self.path.display(),
                        "Failed to save metrics"
                    );
                }
            }
            Err(e) => tracing::debug!(error = %e, "Failed to serialize metrics"),
        }
    }
}
