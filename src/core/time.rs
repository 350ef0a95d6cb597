use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Parses an RFC 3339 timestamp and normalizes it to a UTC wall-clock value.
pub(crate) fn parse_datetime(value: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    let parsed = OffsetDateTime::parse(value, &Rfc3339)?;
    let utc = parsed.to_offset(UtcOffset::UTC);
    Ok(PrimitiveDateTime::new(utc.date(), utc.time()))
}

pub(crate) fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

pub(crate) fn format_date(value: Date) -> String {
    value.format(DATE_FORMAT).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn parse_datetime_normalizes_offset_to_utc() {
        let parsed = parse_datetime("2025-01-02T13:20:30+03:00").unwrap();
        assert_eq!(format_primitive(parsed), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn date_round_trips() {
        let date = parse_date("2025-09-01").unwrap();
        assert_eq!(format_date(date), "2025-09-01");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("September 1st").is_err());
    }
}
