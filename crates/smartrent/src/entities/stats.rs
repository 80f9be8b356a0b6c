//! Aggregated alert statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::alert::{Alert, AlertCategory, AlertPriority, AlertStatus};

/// Active alerts open for at least this many full days count as overdue
pub const OVERDUE_AFTER_DAYS: i64 = 7;

/// Number of calendar months in the trend series, current month included
pub const TREND_MONTHS: u32 = 6;

/// Created/resolved counts for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub created: u64,
    pub resolved: u64,
}

/// Alert statistics for the admin dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub total: u64,
    pub active: u64,
    pub overdue: u64,
    pub by_status: BTreeMap<AlertStatus, u64>,
    pub by_category: BTreeMap<AlertCategory, u64>,
    pub by_priority: BTreeMap<AlertPriority, u64>,
    /// Mean hours from creation to resolution; `None` when nothing resolved
    pub average_resolution_hours: Option<f64>,
    pub monthly_trend: Vec<MonthlyTrend>,
}

impl AlertStats {
    /// Aggregate `alerts` as seen at `now`
    pub fn compute<'a>(alerts: impl IntoIterator<Item = &'a Alert>, now: DateTime<Utc>) -> Self {
        let mut by_status: BTreeMap<_, u64> = AlertStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_category: BTreeMap<_, u64> =
            AlertCategory::ALL.iter().map(|c| (*c, 0)).collect();
        let mut by_priority: BTreeMap<_, u64> =
            AlertPriority::ALL.iter().map(|p| (*p, 0)).collect();

        let months = trailing_months(now, TREND_MONTHS);
        let mut monthly_trend: Vec<MonthlyTrend> = months
            .iter()
            .map(|(year, month)| MonthlyTrend {
                month: format!("{year:04}-{month:02}"),
                created: 0,
                resolved: 0,
            })
            .collect();
        let bucket = |at: DateTime<Utc>| months.iter().position(|m| *m == (at.year(), at.month()));

        let mut total = 0;
        let mut active = 0;
        let mut overdue = 0;
        let mut resolution_ms_sum: i64 = 0;
        let mut resolved_count: u64 = 0;

        for alert in alerts {
            total += 1;
            *by_status.entry(alert.status()).or_insert(0) += 1;
            *by_category.entry(alert.category()).or_insert(0) += 1;
            *by_priority.entry(alert.priority()).or_insert(0) += 1;

            if alert.is_active() {
                active += 1;
                if (now - alert.created_at()).num_days() >= OVERDUE_AFTER_DAYS {
                    overdue += 1;
                }
            }

            if let Some(idx) = bucket(alert.created_at()) {
                monthly_trend[idx].created += 1;
            }

            if let Some(resolved_at) = alert.resolved_at() {
                resolution_ms_sum += (resolved_at - alert.created_at()).num_milliseconds();
                resolved_count += 1;
                if let Some(idx) = bucket(resolved_at) {
                    monthly_trend[idx].resolved += 1;
                }
            }
        }

        let average_resolution_hours = (resolved_count > 0)
            .then(|| resolution_ms_sum as f64 / resolved_count as f64 / 3_600_000.0);

        Self {
            total,
            active,
            overdue,
            by_status,
            by_category,
            by_priority,
            average_resolution_hours,
            monthly_trend,
        }
    }
}

/// `(year, month)` pairs for the `count` months ending at `now`, oldest first
fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<(i32, u32)> {
    let mut year = now.year();
    let mut month = now.month();
    let mut months = Vec::with_capacity(count as usize);
    for _ in 0..count {
        months.push((year, month));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewAlert;
    use chrono::{Duration, TimeZone};

    fn alert(category: AlertCategory, priority: AlertPriority) -> Alert {
        Alert::new(NewAlert {
            title: "Broken window".to_string(),
            description: "Bedroom window does not close".to_string(),
            category,
            priority,
            reporter_id: "U1".to_string(),
            department_id: "D1".to_string(),
            images: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_trailing_months_wraps_year() {
        let now = Utc.with_ymd_and_hms(2026, 2, 15, 12, 0, 0).unwrap();
        assert_eq!(
            trailing_months(now, 6),
            vec![(2025, 9), (2025, 10), (2025, 11), (2025, 12), (2026, 1), (2026, 2)]
        );
    }

    #[test]
    fn test_empty_stats() {
        let stats = AlertStats::compute(std::iter::empty(), Utc::now());
        assert_eq!(stats.total, 0);
        assert!(stats.average_resolution_hours.is_none());
        assert_eq!(stats.by_status.len(), 4);
        assert_eq!(stats.by_category.len(), 6);
        assert_eq!(stats.monthly_trend.len(), TREND_MONTHS as usize);
        assert!(stats.monthly_trend.iter().all(|m| m.created == 0));
    }

    #[test]
    fn test_counts_and_overdue() {
        let now = Utc::now();
        let mut old = alert(AlertCategory::Maintenance, AlertPriority::High);
        old.backdate(now - Duration::days(10));

        let fresh = alert(AlertCategory::Noise, AlertPriority::Low);

        let mut done = alert(AlertCategory::Maintenance, AlertPriority::Urgent);
        done.backdate(now - Duration::days(20));
        done.transition_to(AlertStatus::InProgress).unwrap();
        done.transition_to(AlertStatus::Resolved).unwrap();

        let alerts = [old, fresh, done];
        let stats = AlertStats::compute(&alerts, now);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.by_status[&AlertStatus::Pending], 2);
        assert_eq!(stats.by_status[&AlertStatus::Resolved], 1);
        assert_eq!(stats.by_category[&AlertCategory::Maintenance], 2);
        assert_eq!(stats.by_priority[&AlertPriority::Low], 1);

        let avg = stats.average_resolution_hours.unwrap();
        assert!(avg > 20.0 * 24.0 - 1.0 && avg < 20.0 * 24.0 + 1.0);

        let current = stats.monthly_trend.last().unwrap();
        assert_eq!(current.month, format!("{:04}-{:02}", now.year(), now.month()));
        assert!(current.resolved >= 1);
    }

    #[test]
    fn test_overdue_counts_full_days_only() {
        let now = Utc::now();
        let mut almost = alert(AlertCategory::Cleaning, AlertPriority::Low);
        almost.backdate(now - Duration::hours(6 * 24 + 12));
        let mut week = alert(AlertCategory::Cleaning, AlertPriority::Low);
        week.backdate(now - Duration::days(OVERDUE_AFTER_DAYS));

        let stats = AlertStats::compute(&[almost], now);
        assert_eq!(stats.overdue, 0);

        let stats = AlertStats::compute(&[week], now);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn test_serializes_wire_keys() {
        let alerts = [alert(AlertCategory::Security, AlertPriority::Medium)];
        let json = serde_json::to_value(AlertStats::compute(&alerts, Utc::now())).unwrap();
        assert_eq!(json["byStatus"]["PENDING"], 1);
        assert_eq!(json["byCategory"]["SECURITY"], 1);
        assert!(json["averageResolutionHours"].is_null());
    }
}
