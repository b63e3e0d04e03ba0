//! # Completion Statistics

use entity::{sea_orm_active_enums::TaskStatus, tasks};
use serde::Serialize;

/// Task counts by status plus the completed share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub total:        u64,
    pub completed:    u64,
    pub in_progress:  u64,
    pub todo:         u64,
    pub progress_pct: u8,
}

impl CompletionStats {
    /// Count one more task with `status`.
    pub fn record(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::ToDo => self.todo += 1,
        }
        self.progress_pct = percentage(self.completed, self.total);
    }
}

/// `round(part / total * 100)`, or 0 when `total` is 0.
///
/// Halves round away from zero on the floating-point quotient, so 1/8 gives
/// 13 while 29/200 (14.499999...) gives 14.
pub fn percentage(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Completion statistics for a set of tasks.
pub fn summarize<'a>(tasks: impl IntoIterator<Item = &'a tasks::Model>) -> CompletionStats {
    tasks
        .into_iter()
        .fold(CompletionStats::default(), |mut stats, task| {
            stats.record(task.status);
            stats
        })
}
