mod create;
mod list;
mod manage;

pub(super) use create::create_quiz;
pub(super) use list::{get_quiz, list_quizzes};
pub(super) use manage::{delete_quiz, set_quiz_activation, update_quiz};
