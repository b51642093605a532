use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time, UtcOffset,
};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn to_primitive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Calendar day used as a chart axis label; lexical order equals chronological order.
pub(crate) fn format_day(value: PrimitiveDateTime) -> String {
    value
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.date().to_string())
}

/// Which end of a day a bare `YYYY-MM-DD` bound should snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayBound {
    Start,
    End,
}

/// Accepts an RFC 3339 timestamp or a plain calendar date.
pub(crate) fn parse_bound(raw: &str, bound: DayBound) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(to_primitive_utc(value));
    }

    let date = Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()?;
    let time = match bound {
        DayBound::Start => Time::MIDNIGHT,
        DayBound::End => Time::from_hms_nano(23, 59, 59, 999_999_999).ok()?,
    };
    Some(PrimitiveDateTime::new(date, time))
}
