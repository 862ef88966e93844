mod dashboard;
mod leaderboard;
mod service;

// Public API of the attempt-ledger subsystem.
pub use dashboard::{CompletedTest, DashboardService, StudentMetrics};
pub use leaderboard::{DEFAULT_TOP_N, LeaderboardEntry, LeaderboardRow, LeaderboardService};
pub use service::AttemptService;
