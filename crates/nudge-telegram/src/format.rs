//! Text helpers for Telegram replies.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use nudge_core::{TimeBand, REMINDER_SCHEDULE};

/// Telegram rejects messages over 4096 characters; keep some headroom.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Splits `text` into parts of at most `max_len` characters.
///
/// Parts break at blank-line paragraph boundaries. A paragraph longer than
/// `max_len` on its own is cut at character boundaries.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in text.split("\n\n") {
        for chunk in hard_wrap(paragraph, max_len) {
            let chunk_len = chunk.chars().count();
            if current_len > 0 && current_len + 2 + chunk_len > max_len {
                parts.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push_str("\n\n");
                current_len += 2;
            }
            current.push_str(&chunk);
            current_len += chunk_len;
        }
    }
    if current_len > 0 {
        parts.push(current);
    }

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn hard_wrap(paragraph: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    chars
        .chunks(max_len.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Local wall-clock time of a UTC slot on `date`, like `10:00 AM`.
pub fn local_time(hour: u32, minute: u32, date: NaiveDate, tz: Tz) -> Option<String> {
    let utc = date.and_hms_opt(hour, minute, 0)?;
    let instant: DateTime<Utc> = Utc.from_utc_datetime(&utc);
    Some(instant.with_timezone(&tz).format("%-I:%M %p").to_string())
}

/// The three reminder slots converted to `tz` on the given day.
pub fn reminder_times(tz: Tz, date: NaiveDate) -> Vec<(TimeBand, String)> {
    REMINDER_SCHEDULE
        .iter()
        .filter_map(|(band, hour, minute)| {
            local_time(*hour, *minute, date, tz).map(|time| (*band, time))
        })
        .collect()
}

/// Reminder schedule lines for welcome and help texts.
pub fn schedule_lines(tz: Tz, date: NaiveDate) -> String {
    reminder_times(tz, date)
        .into_iter()
        .map(|(band, time)| {
            let (icon, label) = match band {
                TimeBand::Morning => ("🌅", "Morning"),
                TimeBand::Afternoon => ("☀️", "Afternoon"),
                TimeBand::Evening => ("🌙", "Evening"),
            };
            format!("{} {}: {}", icon, label, time)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_short_message_is_single_part() {
        assert_eq!(split_message("hello\n\nworld", 4000), vec!["hello\n\nworld"]);
    }

    #[test]
    fn test_split_at_paragraphs() {
        let p = "a".repeat(1800);
        let text = format!("{p}\n\n{p}\n\n{p}");

        let parts = split_message(&text, 4000);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], format!("{p}\n\n{p}"));
        assert_eq!(parts[1], p);
    }

    #[test]
    fn test_oversized_paragraph_is_cut() {
        let text = "é".repeat(9000);

        let parts = split_message(&text, 4000);

        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.chars().count() <= 4000));
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn test_reminder_times_in_kolkata() {
        let times = reminder_times(chrono_tz::Asia::Kolkata, day());
        assert_eq!(
            times,
            vec![
                (TimeBand::Morning, "10:00 AM".to_string()),
                (TimeBand::Afternoon, "3:00 PM".to_string()),
                (TimeBand::Evening, "8:00 PM".to_string()),
            ]
        );
    }

    #[test]
    fn test_reminder_times_follow_dst() {
        let winter = reminder_times(chrono_tz::America::New_York, day());
        let summer = reminder_times(
            chrono_tz::America::New_York,
            NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
        );
        assert_eq!(winter[0].1, "11:30 PM");
        assert_eq!(summer[0].1, "12:30 AM");
    }

    #[test]
    fn test_schedule_lines() {
        let lines = schedule_lines(chrono_tz::UTC, day());
        assert_eq!(lines, "🌅 Morning: 4:30 AM\n☀️ Afternoon: 9:30 AM\n🌙 Evening: 2:30 PM");
    }
}
