//! # Overview Payloads
//!
//! Compositions of the primitives in [`crate::stats`], [`crate::members`]
//! and [`crate::trend`] used by the project, portfolio and profile
//! endpoints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{messages, project_files::FileMeta, projects, sea_orm_active_enums::TaskStatus, tasks};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    members::{MemberStats, per_member_breakdown},
    stats::{CompletionStats, percentage, summarize},
    trend::{DailyCompletions, TREND_DAYS, trailing_daily_completions},
};

/// How many recent messages and files an overview carries.
pub const RECENT_LIMIT: usize = 20;

/// Counts shown in a project's summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverviewSummary {
    pub members:  u64,
    pub tasks:    u64,
    pub messages: u64,
    pub files:    u64,
}

/// Everything the project overview page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOverview {
    pub summary:         OverviewSummary,
    pub completion:      CompletionStats,
    /// Newest first, at most [`RECENT_LIMIT`]
    pub recent_messages: Vec<messages::Model>,
    /// Newest first, at most [`RECENT_LIMIT`]
    pub recent_files:    Vec<FileMeta>,
}

/// Compose a project overview.
///
/// `members` is the project's member list; the creator counts as a member
/// whether listed or not, and duplicates count once.
pub fn project_overview(
    project: &projects::Model,
    members: &[Uuid],
    tasks: &[tasks::Model],
    mut messages: Vec<messages::Model>,
    mut files: Vec<FileMeta>,
) -> ProjectOverview {
    let mut participants: Vec<Uuid> = members.to_vec();
    participants.push(project.created_by);
    participants.sort_unstable();
    participants.dedup();

    let summary = OverviewSummary {
        members:  participants.len() as u64,
        tasks:    tasks.len() as u64,
        messages: messages.len() as u64,
        files:    files.len() as u64,
    };

    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages.truncate(RECENT_LIMIT);
    files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    files.truncate(RECENT_LIMIT);

    ProjectOverview {
        summary,
        completion: summarize(tasks),
        recent_messages: messages,
        recent_files: files,
    }
}

/// Analytics for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    pub project_id:       Uuid,
    pub completion:       CompletionStats,
    pub team_performance: Vec<MemberStats>,
    pub completion_trend: Vec<DailyCompletions>,
}

/// Completion stats, per-member breakdown and the trailing seven-day trend.
pub fn project_analytics(
    project_id: Uuid,
    tasks: &[tasks::Model],
    names: &HashMap<Uuid, String>,
    now: DateTime<Utc>,
) -> ProjectAnalytics {
    ProjectAnalytics {
        project_id,
        completion: summarize(tasks),
        team_performance: per_member_breakdown(tasks, names, now),
        completion_trend: trailing_daily_completions(tasks, TREND_DAYS, now),
    }
}

/// Progress of a single project within a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: Uuid,
    pub title:      String,
    #[serde(flatten)]
    pub completion: CompletionStats,
}

/// Roll-up across every project a user can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOverview {
    pub projects:         u64,
    pub completion:       CompletionStats,
    pub project_progress: Vec<ProjectProgress>,
}

/// Overall and per-project completion, in the order `projects` is given.
///
/// Tasks belonging to none of `projects` are ignored.
pub fn portfolio_overview(projects: &[projects::Model], tasks: &[tasks::Model]) -> PortfolioOverview {
    let mut by_project: HashMap<Uuid, CompletionStats> = projects
        .iter()
        .map(|project| (project.id, CompletionStats::default()))
        .collect();
    let mut completion = CompletionStats::default();

    for task in tasks {
        if let Some(stats) = by_project.get_mut(&task.project_id) {
            stats.record(task.status);
            completion.record(task.status);
        }
    }

    let project_progress = projects
        .iter()
        .map(|project| {
            ProjectProgress {
                project_id: project.id,
                title:      project.title.clone(),
                completion: by_project.remove(&project.id).unwrap_or_default(),
            }
        })
        .collect();

    PortfolioOverview {
        projects: projects.len() as u64,
        completion,
        project_progress,
    }
}

/// Activity counters for a user's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub projects:        u64,
    pub assigned_tasks:  u64,
    pub completed_tasks: u64,
    pub completion_rate: u8,
    pub messages_sent:   u64,
    pub files_uploaded:  u64,
}

/// Profile counters from the user's assigned tasks and activity totals.
pub fn activity_stats(projects: u64, assigned: &[tasks::Model], messages_sent: u64, files_uploaded: u64) -> ActivityStats {
    let assigned_tasks = assigned.len() as u64;
    let completed_tasks = assigned
        .iter()
        .filter(|task| task.status == TaskStatus::Completed)
        .count() as u64;

    ActivityStats {
        projects,
        assigned_tasks,
        completed_tasks,
        completion_rate: percentage(completed_tasks, assigned_tasks),
        messages_sent,
        files_uploaded,
    }
}
