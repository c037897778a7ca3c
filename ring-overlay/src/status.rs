//! Level- and category-tagged health reports surfaced to the host.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    /// Availability of the reference frame pose.
    Transform,
    /// Whether the requested resolution fits the vertex budget.
    Resolution,
    /// Outcome of the latest configuration edit.
    Configuration,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transform => "Transform",
            Self::Resolution => "Resolution",
            Self::Configuration => "Configuration",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusLevel {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub category: StatusCategory,
    pub level: StatusLevel,
    pub message: String,
}

impl StatusReport {
    pub fn ok(category: StatusCategory) -> Self {
        Self::new(category, StatusLevel::Ok, "OK")
    }

    pub fn warn(category: StatusCategory, message: impl Into<String>) -> Self {
        Self::new(category, StatusLevel::Warn, message)
    }

    pub fn error(category: StatusCategory, message: impl Into<String>) -> Self {
        Self::new(category, StatusLevel::Error, message)
    }

    pub fn new(category: StatusCategory, level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            category,
            level,
            message: message.into(),
        }
    }
}

/// Receiver for status reports, implemented by the host.
pub trait StatusSink {
    fn report(&mut self, report: StatusReport);
}

/// Keeps every report in arrival order.
impl StatusSink for Vec<StatusReport> {
    fn report(&mut self, report: StatusReport) {
        self.push(report);
    }
}

/// Latest report per category.
///
/// Reports arrive every time a condition is re-evaluated, often once per
/// frame, so only transitions are logged.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    latest: HashMap<StatusCategory, StatusReport>,
}

impl StatusBoard {
    pub fn get(&self, category: StatusCategory) -> Option<&StatusReport> {
        self.latest.get(&category)
    }

    pub fn level(&self, category: StatusCategory) -> Option<StatusLevel> {
        self.get(category).map(|report| report.level)
    }

    /// Most severe level across all categories.
    pub fn worst(&self) -> StatusLevel {
        self.latest
            .values()
            .map(|report| report.level)
            .max()
            .unwrap_or(StatusLevel::Ok)
    }

    /// Reports in a stable category order.
    pub fn reports(&self) -> impl Iterator<Item = &StatusReport> {
        [
            StatusCategory::Transform,
            StatusCategory::Resolution,
            StatusCategory::Configuration,
        ]
        .into_iter()
        .filter_map(|category| self.latest.get(&category))
    }
}

impl StatusSink for StatusBoard {
    fn report(&mut self, report: StatusReport) {
        if self.latest.get(&report.category) == Some(&report) {
            return;
        }

        match report.level {
            StatusLevel::Ok => info!("{}: {}", report.category, report.message),
            StatusLevel::Warn => warn!("{}: {}", report.category, report.message),
            StatusLevel::Error => error!("{}: {}", report.category, report.message),
        }
        self.latest.insert(report.category, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_keeps_latest_per_category() {
        let mut board = StatusBoard::default();
        board.report(StatusReport::warn(StatusCategory::Transform, "missing"));
        board.report(StatusReport::ok(StatusCategory::Transform));
        board.report(StatusReport::error(StatusCategory::Resolution, "too many"));

        assert_eq!(board.level(StatusCategory::Transform), Some(StatusLevel::Ok));
        assert_eq!(board.level(StatusCategory::Configuration), None);
        assert_eq!(board.worst(), StatusLevel::Error);
        assert_eq!(board.reports().count(), 2);
    }

    #[test]
    fn empty_board_is_ok() {
        assert_eq!(StatusBoard::default().worst(), StatusLevel::Ok);
    }

    #[test]
    fn vec_sink_records_everything() {
        let mut sink: Vec<StatusReport> = Vec::new();
        sink.report(StatusReport::ok(StatusCategory::Transform));
        sink.report(StatusReport::ok(StatusCategory::Transform));
        assert_eq!(sink.len(), 2);
    }
}
