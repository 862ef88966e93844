mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the test-taking subsystem.
pub use crate::error::SessionError;
pub use plan::{QuestionDraw, QuestionDrawer};
pub use progress::SessionProgress;
pub use service::TestSession;
pub use workflow::{SubmissionOutcome, TestRunService};
