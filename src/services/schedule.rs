//! Quiz lifecycle timing. The phase is a pure function of the clock and the
//! stored schedule; no status column exists to drift out of date.

use time::{Duration, PrimitiveDateTime};

use crate::core::time::truncate_to_minute;
use crate::db::models::Quiz;
use crate::services::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuizPhase {
    NotStarted,
    InProgress,
    Finished,
}

impl QuizPhase {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            QuizPhase::NotStarted => "not_started",
            QuizPhase::InProgress => "in_progress",
            QuizPhase::Finished => "finished",
        }
    }
}

pub(crate) fn end_time(start_time: PrimitiveDateTime, duration_minutes: i32) -> PrimitiveDateTime {
    start_time + Duration::minutes(i64::from(duration_minutes))
}

/// Both window edges are inclusive: an attempt landing exactly on the end
/// minute is still in progress.
pub(crate) fn phase(
    now: PrimitiveDateTime,
    start_time: PrimitiveDateTime,
    duration_minutes: i32,
) -> QuizPhase {
    if now < start_time {
        return QuizPhase::NotStarted;
    }
    if now <= end_time(start_time, duration_minutes) {
        QuizPhase::InProgress
    } else {
        QuizPhase::Finished
    }
}

pub(crate) fn quiz_phase(quiz: &Quiz, now: PrimitiveDateTime) -> QuizPhase {
    phase(now, quiz.start_time, quiz.duration_minutes)
}

/// Gate for attempt traffic. Deactivation wins over the window so a teacher
/// can pull a quiz mid-flight.
pub(crate) fn ensure_open(quiz: &Quiz, now: PrimitiveDateTime) -> Result<(), QuizError> {
    if !quiz.is_activated {
        return Err(QuizError::NotActivated);
    }
    match quiz_phase(quiz, now) {
        QuizPhase::NotStarted => Err(QuizError::NotStarted),
        QuizPhase::Finished => Err(QuizError::Finished),
        QuizPhase::InProgress => Ok(()),
    }
}

/// Normalizes a requested start to minute precision and rejects starts in
/// the past. "Now" itself, truncated the same way, is allowed.
pub(crate) fn validate_start_time(
    start_time: PrimitiveDateTime,
    now: PrimitiveDateTime,
) -> Result<PrimitiveDateTime, QuizError> {
    let requested = truncate_to_minute(start_time);
    if requested < truncate_to_minute(now) {
        return Err(QuizError::InvalidSchedule("start_time cannot be in the past".to_string()));
    }
    Ok(requested)
}
