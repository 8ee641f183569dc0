// Formatting for the Display-O-Tron: 3 rows of 16 character cells. A payload
// is always 48 chars, row after row, with no line breaks.
extern crate std;

use crate::result;

pub const LINE_WIDTH: usize = 16;
pub const LINE_COUNT: usize = 3;

/// Pads with spaces or cuts to exactly `LINE_WIDTH` chars.
pub fn fit16<T: std::fmt::Display>(text: T) -> String {
    return format!("{:<width$.width$}", text.to_string(), width = LINE_WIDTH);
}

pub fn pluralize_unit(countdown_minutes: &str) -> &'static str {
    if countdown_minutes == "1" {
        return "min";
    }
    return "mins";
}

/// Countdown on the first row, origin on the second, destination on the third.
pub fn render(countdown_minutes: &str, origin: &str, destination: &str) -> String {
    let countdown = format!("{} {}", countdown_minutes, pluralize_unit(countdown_minutes));
    return fit16(countdown) + &fit16(origin) + &fit16(destination);
}

/// Free text screens ("Connecting...", "No trains").
pub fn render_lines(lines: [&str; LINE_COUNT]) -> String {
    return lines.iter().map(|line| fit16(line)).collect();
}

/// Splits a payload back into the rows the hardware would show.
pub fn mock_up(payload: &str) -> Vec<String> {
    let chars: Vec<char> = payload.chars().collect();
    return chars.chunks(LINE_WIDTH)
        .take(LINE_COUNT)
        .map(|row| row.iter().collect())
        .collect();
}

/// Something that shows 48-char payloads.
pub trait CharacterDisplay {
    fn clear(&mut self) -> result::RttDashResult<()>;
    fn write(&mut self, payload: &str) -> result::RttDashResult<()>;
    fn set_contrast(&mut self, contrast: u8) -> result::RttDashResult<()>;
    fn set_backlight(&mut self, red: u8, green: u8, blue: u8) -> result::RttDashResult<()>;
}

/// Prints each payload as the three rows it would occupy on the LCD.
pub struct ConsoleDisplay<W: std::io::Write> {
    out: W,
}

impl ConsoleDisplay<std::io::Stdout> {
    pub fn stdout() -> ConsoleDisplay<std::io::Stdout> {
        return ConsoleDisplay::new(std::io::stdout());
    }
}

impl<W: std::io::Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> ConsoleDisplay<W> {
        return ConsoleDisplay{ out: out };
    }
}

impl<W: std::io::Write> CharacterDisplay for ConsoleDisplay<W> {
    fn clear(&mut self) -> result::RttDashResult<()> {
        return Ok(());
    }

    fn write(&mut self, payload: &str) -> result::RttDashResult<()> {
        writeln!(self.out, "+{}+", "-".repeat(LINE_WIDTH))?;
        for row in mock_up(payload) {
            writeln!(self.out, "|{}|", fit16(row))?;
        }
        writeln!(self.out, "+{}+", "-".repeat(LINE_WIDTH))?;
        self.out.flush()?;
        return Ok(());
    }

    fn set_contrast(&mut self, _contrast: u8) -> result::RttDashResult<()> {
        return Ok(());
    }

    fn set_backlight(&mut self, _red: u8, _green: u8, _blue: u8) -> result::RttDashResult<()> {
        return Ok(());
    }
}
