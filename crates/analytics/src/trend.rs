//! # Completion Trend
//!
//! Completed tasks bucketed by the UTC calendar day they were last updated.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use entity::{sea_orm_active_enums::TaskStatus, tasks};
use serde::Serialize;

/// Window used by the project analytics endpoint.
pub const TREND_DAYS: u32 = 7;

/// Completions on one day. Serializes the date as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCompletions {
    pub date:      NaiveDate,
    pub completed: u64,
}

/// Exactly `days` entries ending today (UTC), oldest first.
///
/// Every day is present even without completions. Completed tasks last
/// updated outside the window are ignored.
pub fn trailing_daily_completions<'a>(
    tasks: impl IntoIterator<Item = &'a tasks::Model>,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<DailyCompletions> {
    let today = now.date_naive();
    let start = today - Duration::days(i64::from(days.saturating_sub(1)));

    let mut buckets: Vec<DailyCompletions> = (0 .. days)
        .map(|offset| {
            DailyCompletions {
                date:      start + Duration::days(i64::from(offset)),
                completed: 0,
            }
        })
        .collect();

    for task in tasks {
        if task.status != TaskStatus::Completed {
            continue;
        }
        let offset = (task.updated_at.date_naive() - start).num_days();
        if let Ok(index) = usize::try_from(offset)
            && let Some(bucket) = buckets.get_mut(index)
        {
            bucket.completed += 1;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;

    fn completed_at(updated_at: DateTime<Utc>, status: TaskStatus) -> tasks::Model {
        tasks::Model {
            id: Uuid::new_v4(),
            title: "task".to_string(),
            description: String::new(),
            status,
            assigned_to: None,
            project_id: Uuid::nil(),
            deadline: None,
            created_at: updated_at,
            updated_at,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap() }

    #[test]
    fn test_empty_input_is_dense() {
        let now = at(2026, 3, 10, 12);
        let trend = trailing_daily_completions(&[], 7, now);

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(trend[6].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert!(trend.iter().all(|day| day.completed == 0));
    }

    #[test]
    fn test_bucketing() {
        let now = at(2026, 3, 10, 12);
        let tasks = vec![
            completed_at(at(2026, 3, 10, 1), TaskStatus::Completed),
            completed_at(at(2026, 3, 10, 23), TaskStatus::Completed),
            completed_at(at(2026, 3, 4, 0), TaskStatus::Completed),
            completed_at(at(2026, 3, 3, 23), TaskStatus::Completed),
            completed_at(at(2026, 3, 8, 9), TaskStatus::InProgress),
            completed_at(at(2026, 3, 12, 9), TaskStatus::Completed),
        ];

        let trend = trailing_daily_completions(&tasks, 7, now);
        let counts: Vec<u64> = trend.iter().map(|day| day.completed).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_crosses_month_boundary() {
        let trend = trailing_daily_completions(&[], 7, at(2026, 3, 2, 0));
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 2, 24).unwrap());
        assert_eq!(trend[6].date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn test_zero_days() {
        assert!(trailing_daily_completions(&[], 0, Utc::now()).is_empty());
    }

    #[test]
    fn test_serialized_date_format() {
        let trend = trailing_daily_completions(&[], 1, at(2026, 1, 5, 8));
        assert_eq!(
            serde_json::to_value(&trend).unwrap(),
            serde_json::json!([{"date": "2026-01-05", "completed": 0}])
        );
    }
}
