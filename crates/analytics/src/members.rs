//! # Per-Member Breakdown
//!
//! Groups tasks by assignee. Groups appear in the order their first task
//! appears in the input, not sorted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{sea_orm_active_enums::TaskStatus, tasks};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::stats::percentage;

/// Display name of the bucket for tasks nobody is assigned to.
pub const UNASSIGNED: &str = "Unassigned";

/// Task counts for one assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    /// `None` for the unassigned bucket
    pub user_id:         Option<Uuid>,
    pub name:            String,
    pub total:           u64,
    pub completed:       u64,
    pub in_progress:     u64,
    pub overdue:         u64,
    pub completion_rate: u8,
}

impl MemberStats {
    fn new(user_id: Option<Uuid>, name: String) -> Self {
        Self {
            user_id,
            name,
            total: 0,
            completed: 0,
            in_progress: 0,
            overdue: 0,
            completion_rate: 0,
        }
    }
}

/// Per-assignee counts, in first-seen order.
///
/// `names` maps assignee ids to display names. A task whose assignee is not
/// in `names` (for instance a deleted account) counts as unassigned.
pub fn per_member_breakdown(tasks: &[tasks::Model], names: &HashMap<Uuid, String>, now: DateTime<Utc>) -> Vec<MemberStats> {
    let mut groups: IndexMap<Option<Uuid>, MemberStats> = IndexMap::new();

    for task in tasks {
        let assignee = task
            .assigned_to
            .and_then(|id| names.get(&id).map(|name| (id, name)));
        let key = assignee.map(|(id, _)| id);

        let entry = groups.entry(key).or_insert_with(|| {
            match assignee {
                Some((id, name)) => MemberStats::new(Some(id), name.clone()),
                None => MemberStats::new(None, UNASSIGNED.to_string()),
            }
        });

        entry.total += 1;
        match task.status {
            TaskStatus::Completed => entry.completed += 1,
            TaskStatus::InProgress => entry.in_progress += 1,
            TaskStatus::ToDo => {},
        }
        if task.is_overdue(now) {
            entry.overdue += 1;
        }
    }

    groups
        .into_values()
        .map(|mut entry| {
            entry.completion_rate = percentage(entry.completed, entry.total);
            entry
        })
        .collect()
}
