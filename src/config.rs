//! Chart options and the settings file they persist to.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, GanttResult};

/// Options recognized by the drag and overlap engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Record key holding a bar's start time.
    pub bar_start: String,
    /// Record key holding a bar's end time.
    pub bar_end: String,
    pub chart_start: String,
    pub chart_end: String,
    /// chrono strftime pattern used for strict parsing and formatting.
    pub date_format: String,
    /// Moved bars displace the bars they overlap.
    pub push_on_overlap: bool,
    /// Roll back a drag that ends with an overlap while pushing is off.
    pub no_overlap: bool,
    /// Floor on bar duration during resize, in minutes.
    pub minimum_gap: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_start: "start".into(),
            bar_end: "end".into(),
            chart_start: "2024-01-01 08:00".into(),
            chart_end: "2024-01-01 18:00".into(),
            date_format: "%Y-%m-%d %H:%M".into(),
            push_on_overlap: false,
            no_overlap: false,
            minimum_gap: 0.0,
        }
    }
}

impl ChartConfig {
    pub fn new(chart_start: impl Into<String>, chart_end: impl Into<String>) -> Self {
        Self {
            chart_start: chart_start.into(),
            chart_end: chart_end.into(),
            ..Default::default()
        }
    }

    pub fn with_push_on_overlap(mut self, enabled: bool) -> Self {
        self.push_on_overlap = enabled;
        self
    }

    pub fn with_no_overlap(mut self, enabled: bool) -> Self {
        self.no_overlap = enabled;
        self
    }

    pub fn with_minimum_gap(mut self, minutes: f64) -> Self {
        self.minimum_gap = minutes;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// The record keys, resolved once for the record boundary.
    pub fn fields(&self) -> BarFields {
        BarFields {
            start: self.bar_start.clone(),
            end: self.bar_end.clone(),
        }
    }

    pub fn minimum_gap_delta(&self) -> TimeDelta {
        TimeDelta::milliseconds((self.minimum_gap.max(0.0) * 60_000.0).round() as i64)
    }

    /// Overlaps that remain after a drag must be undone.
    pub fn rollback_on_overlap(&self) -> bool {
        self.no_overlap && !self.push_on_overlap
    }

    /// Location of `settings.json` in the OS config directory.
    pub fn settings_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "RustGanttTimeline") {
            proj_dirs.config_dir().join("settings.json")
        } else {
            PathBuf::from(".").join("settings.json")
        }
    }

    pub fn load(path: &Path) -> GanttResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GanttError::Configuration(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map_err(|e| GanttError::Configuration(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> GanttResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GanttError::Configuration(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GanttError::Configuration(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, json)
            .map_err(|e| GanttError::Configuration(format!("{}: {}", path.display(), e)))
    }
}

/// Record keys for a bar's start and end times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarFields {
    pub start: String,
    pub end: String,
}
