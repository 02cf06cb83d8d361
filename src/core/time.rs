use time::{
    format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn to_primitive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

/// Drops seconds and sub-second precision. Quiz schedules are compared at
/// minute granularity.
pub(crate) fn truncate_to_minute(value: PrimitiveDateTime) -> PrimitiveDateTime {
    let floored = Time::from_hms(value.hour(), value.minute(), 0).unwrap_or(value.time());
    PrimitiveDateTime::new(value.date(), floored)
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}
