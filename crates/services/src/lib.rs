#![forbid(unsafe_code)]

pub mod attempts;
pub mod error;
pub mod sessions;

pub use portal_core::Clock;

pub use error::{AttemptServiceError, DashboardError, LeaderboardError, SessionError};

pub use attempts::{
    AttemptService, CompletedTest, DEFAULT_TOP_N, DashboardService, LeaderboardEntry,
    LeaderboardRow, LeaderboardService, StudentMetrics,
};
pub use sessions::{
    QuestionDraw, QuestionDrawer, SessionProgress, SubmissionOutcome, TestRunService, TestSession,
};
