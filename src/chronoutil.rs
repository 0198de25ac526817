use {
    chrono::{
        format::{ParseError, ParseResult},
        naive::{NaiveDate, NaiveDateTime, NaiveTime},
        offset::FixedOffset,
        DateTime,
    },
    lazy_static::lazy_static,
    regex::{Captures, Regex},
    std::str::FromStr,
};

lazy_static! {
    /// ISO 8601 timestamp format, basic or extended, with an optional fractional second.
    static ref ISO_8601_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})-?
        (?P<month>0[1-9]|1[0-2])-?
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3]):?
        (?P<minute>[0-5][0-9]):?
        (?P<second>[0-5][0-9]|60)
        (?:[.,](?P<fraction>\d{1,9})\d*)?
        (?P<offset>[-+](?:[01][0-9]|2[0-3]):?[0-5][0-9]|Z)$").unwrap();

    static ref INVALID: ParseError = DateTime::<FixedOffset>::from_str("").unwrap_err();
}

pub(crate) trait ParseISO8601<T> {
    fn parse_from_iso8601(s: &str) -> ParseResult<T>;
}

impl ParseISO8601<DateTime<FixedOffset>> for DateTime<FixedOffset> {
    fn parse_from_iso8601(s: &str) -> ParseResult<DateTime<FixedOffset>> {
        let cap = ISO_8601_REGEX.captures(s).ok_or(*INVALID)?;

        let year = capture::<i32>(&cap, "year")?;
        let month = capture::<u32>(&cap, "month")?;
        let day = capture::<u32>(&cap, "day")?;
        let naive_date = NaiveDate::from_ymd_opt(year, month, day).ok_or(*INVALID)?;

        let hour = capture::<u32>(&cap, "hour")?;
        let minute = capture::<u32>(&cap, "minute")?;
        // Leap seconds are folded into the last second of the minute.
        let second = capture::<u32>(&cap, "second")?.min(59);
        let nanos = match cap.name("fraction") {
            Some(fraction) => {
                // Right-pad to nanoseconds: "123" -> 123000000.
                let digits = fraction.as_str();
                u32::from_str(digits).map_err(|_| *INVALID)? * 10u32.pow(9 - digits.len() as u32)
            }
            None => 0,
        };
        let naive_time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or(*INVALID)?;
        let naive_dt = NaiveDateTime::new(naive_date, naive_time);

        let offset_str = cap.name("offset").ok_or(*INVALID)?.as_str();
        let offset_secs = if offset_str == "Z" {
            0
        } else {
            let offset_condensed = offset_str.replace(':', "");
            // Must be [+-]HHMM at this point
            let (sign_str, hm) = offset_condensed.split_at(1);
            let (hour_off_str, minute_off_str) = hm.split_at(2);

            let sign = if sign_str == "-" {
                -1
            } else {
                1
            };

            let hour = i32::from_str(hour_off_str).map_err(|_| *INVALID)?;
            let min = i32::from_str(minute_off_str).map_err(|_| *INVALID)?;
            sign * (hour * 3600 + min * 60)
        };

        let offset = FixedOffset::east_opt(offset_secs).ok_or(*INVALID)?;
        naive_dt.and_local_timezone(offset).single().ok_or(*INVALID)
    }
}

fn capture<T: FromStr>(cap: &Captures, name: &str) -> ParseResult<T> {
    cap.name(name).and_then(|m| T::from_str(m.as_str()).ok()).ok_or(*INVALID)
}
