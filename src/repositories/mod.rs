pub(crate) mod answers;
pub(crate) mod assignments;
pub(crate) mod questions;
pub(crate) mod quizzes;
pub(crate) mod results;
