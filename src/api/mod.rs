pub(crate) mod attempts;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod questions;
pub(crate) mod quizzes;
pub(crate) mod results;
pub(crate) mod router;
