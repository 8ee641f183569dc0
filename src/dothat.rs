extern crate rppal;
extern crate std;

use rppal::gpio::{Gpio, OutputPin};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::display;
use crate::display::CharacterDisplay;
use crate::result;
use crate::sn3218;

// Display-O-Tron HAT: ST7036 3x16 LCD on SPI0/CE0.
const REGISTER_SELECT_PIN : u8 = 25;
const RESET_PIN : u8 = 12;
const SPI_CLOCK_HZ : u32 = 1_000_000;

const COMMAND_CLEAR : u8 = 0b0000_0001;
const COMMAND_SET_DISPLAY_MODE : u8 = 0b0000_1000;
const COMMAND_BIAS : u8 = 0b0001_0100;
const COMMAND_BOOSTER_CONTRAST_HIGH : u8 = 0b0101_0100;
const COMMAND_CONTRAST_LOW : u8 = 0b0111_0000;
const COMMAND_SET_DDRAM_ADDRESS : u8 = 0b1000_0000;

const DISPLAY_ON : u8 = 0b0000_0100;

// Function set: 8-bit bus, two-line addressing. OR in the instruction table.
const INSTRUCTION_SET_TEMPLATE : u8 = 0b0011_1000;

const ROW_OFFSETS : [u8; display::LINE_COUNT] = [0x00, 0x10, 0x20];

const DEFAULT_CONTRAST : u8 = 40;

pub struct Dothat {
    spi: Spi,
    register_select: OutputPin,
    reset: OutputPin,
    backlight: sn3218::Sn3218,
}

impl Dothat {
    pub fn new() -> result::RttDashResult<Dothat> {
        let gpio = Gpio::new()?;
        let register_select = gpio.get(REGISTER_SELECT_PIN)?.into_output();
        let reset = gpio.get(RESET_PIN)?.into_output();

        // Don't forget to enable SPI with sudo raspi-config
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)?;
        // ... and I2C for the backlight.
        let backlight = sn3218::Sn3218::new()?;

        let mut lcd = Dothat{
            spi: spi,
            register_select: register_select,
            reset: reset,
            backlight: backlight,
        };
        lcd.init()?;
        return Ok(lcd);
    }

    fn init(&mut self) -> result::RttDashResult<()> {
        self.reset.set_low();
        std::thread::sleep(std::time::Duration::from_millis(1));
        self.reset.set_high();
        std::thread::sleep(std::time::Duration::from_millis(50));

        self.send_command(COMMAND_SET_DISPLAY_MODE | DISPLAY_ON)?;

        // Bias 1/4, three-line mode.
        self.write_instruction_set(1)?;
        self.send_command(COMMAND_BIAS | (1 << 3) | 1)?;
        self.write_instruction_set(0)?;

        self.set_contrast(DEFAULT_CONTRAST)?;
        return self.clear();
    }

    fn write_instruction_set(&mut self, table: u8) -> result::RttDashResult<()> {
        self.register_select.set_low();
        self.spi_write(&[INSTRUCTION_SET_TEMPLATE | table])?;
        std::thread::sleep(std::time::Duration::from_micros(60));
        return Ok(());
    }

    fn send_command(&mut self, command: u8) -> result::RttDashResult<()> {
        self.register_select.set_low();
        self.spi_write(&[command])?;
        std::thread::sleep(std::time::Duration::from_micros(50));
        return Ok(());
    }

    fn send_data(&mut self, data: u8) -> result::RttDashResult<()> {
        self.register_select.set_high();
        self.spi_write(&[data])?;
        std::thread::sleep(std::time::Duration::from_micros(50));
        return Ok(());
    }

    fn spi_write(&mut self, bytes: &[u8]) -> result::RttDashResult<()> {
        let written = self.spi.write(bytes)?;
        if written != bytes.len() {
            return Err(result::make_error(&format!(
                "Short SPI write: {} of {} bytes", written, bytes.len())));
        }
        return Ok(());
    }

    fn set_cursor(&mut self, row: usize, column: u8) -> result::RttDashResult<()> {
        return self.send_command(COMMAND_SET_DDRAM_ADDRESS | (ROW_OFFSETS[row] + column));
    }
}

/// The ST7036 ROM only agrees with ASCII, so everything else becomes '?'.
fn lcd_byte(c: char) -> u8 {
    if c.is_ascii() && !c.is_ascii_control() {
        return c as u8;
    }
    return b'?';
}

impl display::CharacterDisplay for Dothat {
    fn clear(&mut self) -> result::RttDashResult<()> {
        self.send_command(COMMAND_CLEAR)?;
        // Clear takes ~1.1ms on this controller.
        std::thread::sleep(std::time::Duration::from_millis(2));
        return self.set_cursor(0, 0);
    }

    fn write(&mut self, payload: &str) -> result::RttDashResult<()> {
        for (row, text) in display::mock_up(payload).iter().enumerate() {
            self.set_cursor(row, 0)?;
            for c in display::fit16(text).chars() {
                self.send_data(lcd_byte(c))?;
            }
        }
        return Ok(());
    }

    fn set_contrast(&mut self, contrast: u8) -> result::RttDashResult<()> {
        let contrast = std::cmp::min(contrast, 0x3F);

        // Booster must be on for 3.3V operation; it lives in instruction table 1.
        self.write_instruction_set(1)?;
        self.send_command(COMMAND_BOOSTER_CONTRAST_HIGH | ((contrast >> 4) & 0x03))?;
        self.send_command(COMMAND_CONTRAST_LOW | (contrast & 0x0F))?;
        return self.write_instruction_set(0);
    }

    fn set_backlight(&mut self, red: u8, green: u8, blue: u8) -> result::RttDashResult<()> {
        return self.backlight.output(&sn3218::backlight_channels(red, green, blue));
    }
}
