extern crate rppal;

use rppal::i2c::I2c;

use crate::result;

// SN3218 18-channel LED driver on I2C bus 1. The Display-O-Tron HAT wires
// channels 0-8 to the three backlight zones and 9-17 to the bar graph.
const I2C_BUS : u8 = 1;
const I2C_ADDRESS : u16 = 0x54;

const REGISTER_SHUTDOWN : u8 = 0x00;
const REGISTER_PWM : u8 = 0x01;
const REGISTER_ENABLE_LEDS : u8 = 0x13;
const REGISTER_UPDATE : u8 = 0x16;

const SHUTDOWN_NORMAL_OPERATION : u8 = 0x01;
const UPDATE_LATCH : u8 = 0xFF;

pub const CHANNEL_COUNT : usize = 18;
const BACKLIGHT_ZONES : usize = 3;

pub struct Sn3218 {
    i2c: I2c,
}

impl Sn3218 {
    pub fn new() -> result::RttDashResult<Sn3218> {
        let mut i2c = I2c::with_bus(I2C_BUS)?;
        i2c.set_slave_address(I2C_ADDRESS)?;

        let driver = Sn3218{ i2c: i2c };
        driver.i2c.smbus_write_byte(REGISTER_SHUTDOWN, SHUTDOWN_NORMAL_OPERATION)?;
        // Enable bits are packed six channels per register.
        driver.i2c.block_write(REGISTER_ENABLE_LEDS, &[0x3F, 0x3F, 0x3F])?;
        return Ok(driver);
    }

    pub fn output(&mut self, channels: &[u8; CHANNEL_COUNT]) -> result::RttDashResult<()> {
        self.i2c.block_write(REGISTER_PWM, channels)?;
        self.i2c.smbus_write_byte(REGISTER_UPDATE, UPDATE_LATCH)?;
        return Ok(());
    }
}

/// PWM values for every channel with all three backlight zones set to one
/// colour and the bar graph off. The HAT wires each zone blue, green, red.
pub fn backlight_channels(red: u8, green: u8, blue: u8) -> [u8; CHANNEL_COUNT] {
    let mut channels = [0u8; CHANNEL_COUNT];
    for zone in 0..BACKLIGHT_ZONES {
        channels[zone * 3] = blue;
        channels[zone * 3 + 1] = green;
        channels[zone * 3 + 2] = red;
    }
    return channels;
}
