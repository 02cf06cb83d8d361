use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use validator::Validate;

pub(crate) use crate::core::time::format_primitive;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: i64,
    #[serde(alias = "groupId")]
    pub(crate) group_id: i64,
    #[serde(alias = "questionCount")]
    #[validate(range(min = 1, message = "question_count must be positive"))]
    pub(crate) question_count: i32,
    #[serde(alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: i32,
    #[serde(alias = "startTime", deserialize_with = "deserialize_offset_datetime_flexible")]
    pub(crate) start_time: OffsetDateTime,
    #[validate(length(min = 1, message = "pin must not be empty"))]
    pub(crate) pin: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "pin must not be empty"))]
    pub(crate) pin: Option<String>,
    #[serde(default)]
    #[serde(
        alias = "startTime",
        deserialize_with = "deserialize_option_offset_datetime_flexible"
    )]
    pub(crate) start_time: Option<OffsetDateTime>,
    #[serde(default)]
    #[serde(alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizActivation {
    pub(crate) active: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) teacher_id: i64,
    pub(crate) group_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) question_count: i32,
    pub(crate) duration_minutes: i32,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) status: String,
    pub(crate) pin: String,
    pub(crate) is_activated: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

fn parse_offset_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // Frontend's datetime-local often sends without timezone.
    if raw.len() == 16 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}:00Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    if raw.len() == 19 && raw.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{raw}Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    // Fallback for explicit format "YYYY-MM-DDTHH:MM[:SS]"
    if let Ok(value) =
        PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    {
        return Some(value.assume_utc());
    }
    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value.assume_utc());
    }

    None
}

fn deserialize_offset_datetime_flexible<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_offset_datetime_flexible(&raw)
        .ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
}

fn deserialize_option_offset_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_offset_datetime_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rfc3339_and_datetime_local() {
        let full = parse_offset_datetime_flexible("2025-01-01T10:00:00Z").unwrap();
        let local_minutes = parse_offset_datetime_flexible("2025-01-01T10:00").unwrap();
        let local_seconds = parse_offset_datetime_flexible("2025-01-01T10:00:00").unwrap();

        assert_eq!(full, local_minutes);
        assert_eq!(full, local_seconds);
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(parse_offset_datetime_flexible("next tuesday").is_none());
    }

    #[test]
    fn quiz_create_accepts_camel_case_aliases() {
        let payload: QuizCreate = serde_json::from_value(serde_json::json!({
            "name": "Algebra midterm",
            "subjectId": 3,
            "groupId": 5,
            "questionCount": 10,
            "durationMinutes": 30,
            "startTime": "2025-01-01T10:00",
            "pin": "4242"
        }))
        .unwrap();

        assert_eq!(payload.subject_id, 3);
        assert_eq!(payload.question_count, 10);
        assert!(payload.validate().is_ok());
    }

    fn quiz_payload(count: i32, duration: i32, name: &str, pin: &str) -> QuizCreate {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "subjectId": 3,
            "groupId": 5,
            "questionCount": count,
            "durationMinutes": duration,
            "startTime": "2025-01-01T10:00",
            "pin": pin
        }))
        .unwrap()
    }

    #[test]
    fn rejects_non_positive_counts_and_blank_fields() {
        assert!(quiz_payload(0, 30, "Algebra midterm", "4242").validate().is_err());
        assert!(quiz_payload(10, 0, "Algebra midterm", "4242").validate().is_err());
        assert!(quiz_payload(10, -5, "Algebra midterm", "4242").validate().is_err());
        assert!(quiz_payload(10, 30, "", "4242").validate().is_err());
        assert!(quiz_payload(10, 30, "Algebra midterm", "").validate().is_err());
    }
}
