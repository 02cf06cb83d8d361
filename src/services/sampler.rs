//! Random question-pool assignment. The RNG is injected so callers can seed
//! it; production paths seed from entropy, tests pass a fixed seed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::services::QuizError;

/// Picks `requested` distinct ids from `available` uniformly at random.
/// A short universe is an error; quizzes never launch with a partial pool.
pub(crate) fn sample_question_ids(
    available: &[i64],
    requested: i32,
    rng: &mut impl Rng,
) -> Result<Vec<i64>, QuizError> {
    let requested_len = usize::try_from(requested).unwrap_or(0);
    if requested_len == 0 || available.len() < requested_len {
        return Err(QuizError::InsufficientQuestionPool {
            requested,
            available: available.len() as i64,
        });
    }

    let mut ids = available.to_vec();
    ids.shuffle(rng);
    ids.truncate(requested_len);
    Ok(ids)
}
