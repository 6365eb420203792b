//! In-process dashboard session state

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::screening::ScreenReport;

/// State kept between tab runs
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    last_report: Option<ScreenReport>,
}

impl DashboardSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            last_report: None,
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    /// Replace the stored screening report
    pub fn store_report(&mut self, report: ScreenReport) -> &ScreenReport {
        self.update_activity();
        self.last_report.insert(report)
    }

    pub fn last_report(&self) -> Option<&ScreenReport> {
        self.last_report.as_ref()
    }

    pub fn has_results(&self) -> bool {
        self.last_report.is_some()
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}
