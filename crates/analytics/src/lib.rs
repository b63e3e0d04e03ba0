//! # DevCollab Analytics
//!
//! Read-side aggregation over task, message and file records that have
//! already been fetched and authorized. Nothing here touches the database or
//! performs access checks, and nothing here fails: empty input yields
//! all-zero results.

pub mod members;
pub mod overview;
pub mod stats;
pub mod trend;

pub use members::{MemberStats, UNASSIGNED, per_member_breakdown};
pub use overview::{
    ActivityStats,
    OverviewSummary,
    PortfolioOverview,
    ProjectAnalytics,
    ProjectOverview,
    ProjectProgress,
    RECENT_LIMIT,
    activity_stats,
    portfolio_overview,
    project_analytics,
    project_overview,
};
pub use stats::{CompletionStats, percentage, summarize};
pub use trend::{DailyCompletions, TREND_DAYS, trailing_daily_completions};
