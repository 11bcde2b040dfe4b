use analytics::StatisticsReport;
use chrono::{DateTime, Utc};
use risk::RiskAssessment;
use serde::{Deserialize, Serialize};

/// Everything the dashboard shows, computed from one consistent view of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub taken_at: DateTime<Utc>,
    pub report: StatisticsReport,
    pub risk: RiskAssessment,
}
