mod account;
mod answer;
mod attempt;
mod ids;
mod question;
mod test_def;

pub use account::{Account, AccountError, Lecturer, Role, Student};
pub use answer::{AnswerError, AnswerSelection, AnswerSheet};
pub use attempt::{AttemptError, AttemptResult};
pub use ids::{LecturerId, ParseIdError, QuestionId, StudentId, TestId};
pub use question::{Question, QuestionError};
pub use test_def::{TestDefinition, TestDefinitionError};
