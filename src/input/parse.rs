use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a user-entered point in time.
///
/// Accepted forms:
/// - `YYYY-MM-DD HH:MM` or `YYYY-MM-DDTHH:MM` (seconds optional)
/// - `YYYY-MM-DD`, meaning the end of that day (23:59)
/// - an RFC 3339 timestamp
/// - `+N` followed by `m`, `h`, `d` or `w`, relative to `now`
pub fn parse_datetime(input: &str, now: DateTime<Local>) -> Result<DateTime<Local>> {
    let input = input.trim();
    if input.is_empty() {
        bail!("Empty date");
    }

    if let Some(offset) = input.strip_prefix('+') {
        return now
            .checked_add_signed(parse_offset(offset)?)
            .ok_or_else(|| anyhow!("Offset `+{}` is out of range", offset));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Local));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return to_local(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).context("Invalid time")?;
        return to_local(date.and_time(end_of_day));
    }

    Err(anyhow!(
        "Invalid date `{}`. Use YYYY-MM-DD, YYYY-MM-DD HH:MM or +30m/+2h/+1d",
        input
    ))
}

fn parse_offset(offset: &str) -> Result<Duration> {
    let unit = offset
        .chars()
        .last()
        .ok_or_else(|| anyhow!("Missing offset amount"))?;
    let amount: i64 = offset[..offset.len() - unit.len_utf8()]
        .parse()
        .with_context(|| format!("Invalid offset `+{}`", offset))?;

    let duration = match unit {
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        other => bail!("Unknown offset unit `{}`; use m, h, d or w", other),
    };
    duration.ok_or_else(|| anyhow!("Offset `+{}` is out of range", offset))
}

fn to_local(naive: NaiveDateTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("{} does not exist in the local time zone", naive))
}

/// Split comma separated values, dropping blanks
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
