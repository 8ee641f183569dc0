// Realtime-status tokens as printed in the "actual" column of the board:
//   "2008"   -> 20:08:00
//   "1957½"  -> 19:57:30
//   "Cancel" -> service cancelled
// Anything else ("", "(Q)", "-") tells us nothing about when the train is due.
extern crate chrono;

use crate::result;

const CANCELLED_MARKER: &str = "Cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusToken {
    Cancelled,
    Time(ClockTime),
    Unrecognized,
}

/// Classifies a raw status token.
///
/// The hour and minute are not range checked here, so "9999" is a `Time`.
/// Out-of-range values are rejected later by `normalize_time`.
pub fn classify_status(token: Option<&str>) -> StatusToken {
    let token = match token {
        None => return StatusToken::Unrecognized,
        Some(token) => token,
    };

    if token == CANCELLED_MARKER {
        return StatusToken::Cancelled;
    }

    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 4 || !chars[0..4].iter().all(|c| c.is_ascii_digit()) {
        return StatusToken::Unrecognized;
    }

    let hour = digits_value(&chars[0..2]);
    let minute = digits_value(&chars[2..4]);
    let second = chars.get(4).map(|glyph| quarter_minute_seconds(*glyph)).unwrap_or(0);

    return StatusToken::Time(ClockTime{
        hour: hour,
        minute: minute,
        second: second,
    });
}

fn digits_value(digits: &[char]) -> u32 {
    return digits.iter().fold(0, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0));
}

fn quarter_minute_seconds(glyph: char) -> u32 {
    match glyph {
        '¼' => 15,
        '½' => 30,
        '¾' => 45,
        _ => 0,
    }
}

impl ClockTime {
    /// The first moment at this wall-clock time that is not before
    /// `reference_now`: today, or tomorrow if today's has already gone.
    pub fn on_or_after(&self, reference_now: &chrono::NaiveDateTime) -> result::RttDashResult<chrono::NaiveDateTime> {
        let candidate = reference_now.date()
            .and_hms_opt(self.hour, self.minute, self.second)
            .ok_or_else(|| result::make_error(&format!(
                "Not a clock time: {:02}{:02}+{}s", self.hour, self.minute, self.second)))?;

        if candidate < *reference_now {
            return candidate.checked_add_signed(chrono::Duration::days(1))
                .ok_or_else(|| result::make_error("Date overflow rolling past midnight"));
        }

        return Ok(candidate);
    }
}

/// Turns a status token into the absolute time it refers to, relative to
/// `reference_now`. Only tokens that classify as `Time` can be normalized.
#[allow(dead_code)]
pub fn normalize_time(token: &str, reference_now: &chrono::NaiveDateTime) -> result::RttDashResult<chrono::NaiveDateTime> {
    match classify_status(Some(token)) {
        StatusToken::Time(clock_time) => return clock_time.on_or_after(reference_now),
        other => return Err(result::make_error(&format!(
            "Status '{}' is not a time ({:?})", token, other))),
    }
}

/// Whole minutes from `reference_now` until `event_time`, truncated toward
/// zero. Negative once the event has passed.
pub fn minutes_until(event_time: &chrono::NaiveDateTime, reference_now: &chrono::NaiveDateTime) -> i64 {
    let wait_seconds = event_time.signed_duration_since(*reference_now).num_seconds();
    return wait_seconds / 60;
}
