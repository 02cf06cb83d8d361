use rand::seq::SliceRandom;
use rand::Rng;
use time::PrimitiveDateTime;

use crate::core::time::format_primitive;
use crate::db::models::{Question, Quiz};
use crate::schemas::attempt::{AttemptOption, AttemptQuestion, QuizSummary};
use crate::services::schedule;

/// Collapses a question's option columns into the options actually present
/// and shuffles them, so the stored position of the correct answer leaks
/// nothing. Clients must submit the option value, never its position.
pub(super) fn attempt_question(question: &Question, rng: &mut impl Rng) -> AttemptQuestion {
    let mut options: Vec<AttemptOption> = [
        (&question.option_a, &question.option_a_image),
        (&question.option_b, &question.option_b_image),
        (&question.option_c, &question.option_c_image),
        (&question.option_d, &question.option_d_image),
    ]
    .into_iter()
    .filter(|(text, image)| text.is_some() || image.is_some())
    .map(|(text, image)| AttemptOption { text: text.clone(), image: image.clone() })
    .collect();
    options.shuffle(rng);

    AttemptQuestion {
        id: question.id,
        text: question.text.clone(),
        image: question.image.clone(),
        options,
    }
}

pub(super) fn quiz_summary(quiz: &Quiz, now: PrimitiveDateTime) -> QuizSummary {
    QuizSummary {
        id: quiz.id,
        name: quiz.name.clone(),
        subject_id: quiz.subject_id,
        question_count: quiz.question_count,
        duration_minutes: quiz.duration_minutes,
        start_time: format_primitive(quiz.start_time),
        end_time: format_primitive(schedule::end_time(quiz.start_time, quiz.duration_minutes)),
        status: schedule::quiz_phase(quiz, now).as_str().to_string(),
    }
}
