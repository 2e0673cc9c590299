use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::Event;

/// Channel aliases, spaces and dashes removed, mapped to the API slug.
const CHANNEL_ALIASES: [(&str, &str); 13] = [
    ("rai1", "rai-1"),
    ("rai2", "rai-2"),
    ("rai3", "rai-3"),
    ("rai4", "rai-4"),
    ("rai5", "rai-5"),
    ("raimovie", "rai-movie"),
    ("raipremium", "rai-premium"),
    ("raigulp", "rai-gulp"),
    ("raiyoyo", "rai-yoyo"),
    ("raistoria", "rai-storia"),
    ("raiscuola", "rai-scuola"),
    ("rainews24", "rai-news-24"),
    ("raisport", "rai-sport"),
];

/// Channels checked by `now`.
pub const ALL_CHANNELS: [&str; 13] = [
    "rai-1",
    "rai-2",
    "rai-3",
    "rai-4",
    "rai-5",
    "rai-movie",
    "rai-premium",
    "rai-gulp",
    "rai-yoyo",
    "rai-storia",
    "rai-scuola",
    "rai-news-24",
    "rai-sport",
];

/// Channels used by `prime-time`.
pub const PRIME_TIME_CHANNELS: [&str; 3] = ["rai-1", "rai-2", "rai-3"];

/// Channels scanned by `search`.
pub const SEARCH_CHANNELS: [&str; 8] = [
    "rai-1",
    "rai-2",
    "rai-3",
    "rai-4",
    "rai-5",
    "rai-movie",
    "rai-premium",
    "rai-storia",
];

/// Timestamp format of `login_time`, `last_refresh` and `_cached_at`.
pub const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Date format used in schedule URLs and headers.
pub const API_DATE_FORMAT: &str = "%d-%m-%Y";

const INPUT_DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

pub fn normalize_channel(channel: &str) -> String {
    let clean = channel.to_lowercase().replace([' ', '-'], "");

    if let Some((_, slug)) = CHANNEL_ALIASES.iter().find(|(alias, _)| *alias == clean) {
        return slug.to_string();
    }

    if channel.starts_with("rai-") {
        return channel.to_string();
    }

    format!("rai-{}", channel.to_lowercase())
}

/// Resolves the user supplied date into a calendar day.
///
/// Accepts `oggi`/`today`, `domani`/`tomorrow`, `ieri`/`yesterday`,
/// `dd-mm-yyyy`, `dd/mm/yyyy`, `yyyy-mm-dd` and day offsets such as `+1` or
/// `-2`. `None` means today.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate, String> {
    let Some(raw) = input else {
        return Ok(today);
    };
    let value = raw.trim();

    match value {
        "oggi" | "today" => return Ok(today),
        "domani" | "tomorrow" => return Ok(today + Duration::days(1)),
        "ieri" | "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    for fmt in INPUT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(date);
        }
    }

    if value.starts_with('+') || value.starts_with('-') {
        if let Ok(offset) = value.parse::<i64>() {
            if let Some(date) = today.checked_add_signed(Duration::days(offset)) {
                return Ok(date);
            }
        }
    }

    Err(format!("Invalid date format: {}", raw))
}

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

fn parse_hms(duration: &str) -> Option<(i64, i64, i64)> {
    let parts: Vec<&str> = duration.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let h = parts[0].trim().parse::<i64>().ok()?;
    let m = parts[1].trim().parse::<i64>().ok()?;
    let s = parts[2].trim().parse::<i64>().ok()?;
    Some((h, m, s))
}

fn end_time(start: NaiveDateTime, (h, m, s): (i64, i64, i64)) -> Option<NaiveDateTime> {
    let length = Duration::try_hours(h)?
        .checked_add(&Duration::try_minutes(m)?)?
        .checked_add(&Duration::try_seconds(s)?)?;
    start.checked_add_signed(length)
}

/// Turns `HH:MM:SS` into `1h05m` or `45m`. Other shapes are returned as is.
pub fn format_duration(duration: &str) -> String {
    if duration.is_empty() {
        return String::new();
    }

    match parse_hms(duration) {
        Some((h, m, _)) if h > 0 => format!("{}h{:02}m", h, m),
        Some((_, m, _)) => format!("{}m", m),
        None => duration.to_string(),
    }
}

/// Whether a program starting today at `hour` is on air at `now`.
///
/// With a `HH:MM:SS` duration the end time is inclusive. Without a duration,
/// or with one of another shape, a program counts as current once it has
/// started. A three-part duration that is not numeric never matches.
pub fn is_current_program(hour: &str, duration: &str, now: NaiveDateTime) -> bool {
    if hour.is_empty() {
        return false;
    }

    let Ok(start_time) = NaiveTime::parse_from_str(hour.trim(), "%H:%M") else {
        return false;
    };
    let start = now.date().and_time(start_time);

    if duration.split(':').count() == 3 {
        return match parse_hms(duration).and_then(|hms| end_time(start, hms)) {
            Some(end) => start <= now && now <= end,
            None => false,
        };
    }

    start <= now
}

pub fn find_current_program<'a>(events: &[&'a Event], now: NaiveDateTime) -> Option<&'a Event> {
    events
        .iter()
        .copied()
        .filter(|e| !e.is_empty())
        .find(|e| is_current_program(e.hour_or(""), e.duration_str(), now))
}

/// Keeps events whose dfp typology and genre match, ignoring case.
pub fn filter_by_dfp<'a>(
    events: Vec<&'a Event>,
    typology: Option<&str>,
    genre: Option<&str>,
) -> Vec<&'a Event> {
    let typology = typology.filter(|t| !t.is_empty());
    let genre = genre.filter(|g| !g.is_empty());

    if typology.is_none() && genre.is_none() {
        return events;
    }

    events
        .into_iter()
        .filter(|event| !event.is_empty())
        .filter(|event| {
            let dfp = event.dfp.clone().unwrap_or_default();

            if let Some(t) = typology {
                let name = dfp.escaped_typology_name.unwrap_or_default();
                if name.to_lowercase() != t.to_lowercase() {
                    return false;
                }
            }

            if let Some(g) = genre {
                let name = dfp.escaped_genre_name.unwrap_or_default();
                if name.to_lowercase() != g.to_lowercase() {
                    return false;
                }
            }

            true
        })
        .collect()
}

/// Keeps events starting between `from` and `to` (both `HH:MM`, inclusive).
pub fn filter_by_time_range<'a>(
    events: Vec<&'a Event>,
    from: Option<&str>,
    to: Option<&str>,
) -> Vec<&'a Event> {
    events
        .into_iter()
        .filter(|event| {
            let hour = event.hour_or("00:00");
            if let Some(from) = from {
                if hour < from {
                    return false;
                }
            }
            if let Some(to) = to {
                if hour > to {
                    return false;
                }
            }
            true
        })
        .collect()
}

pub fn is_prime_time(hour: &str) -> bool {
    ("20:"..="23:59").contains(&hour)
}

/// Cuts `text` to `max` characters, the last three being `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn iso_timestamp(at: NaiveDateTime) -> String {
    at.format(ISO_TIMESTAMP_FORMAT).to_string()
}

/// Local wall-clock time as an ISO 8601 timestamp without offset.
pub fn iso_now() -> String {
    iso_timestamp(Local::now().naive_local())
}

/// Parses timestamps written by [`iso_timestamp`], with or without
/// fractional seconds, or a bare `yyyy-mm-dd` date (midnight).
pub fn parse_iso_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
