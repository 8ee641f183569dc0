extern crate anyhow;
extern crate flexi_logger;
extern crate reqwest;
extern crate rppal;
extern crate serde_json;
extern crate std;

pub type RttDashResult<T> = std::result::Result<T, RttDashError>;

#[derive(Debug)]
pub enum RttDashError {
    ContextError(anyhow::Error),
    GpioError(rppal::gpio::Error),
    HttpError(reqwest::Error),
    I2cError(rppal::i2c::Error),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    LoggerError(flexi_logger::FlexiLoggerError),
    SpiError(rppal::spi::Error),
    Other(String),
}

pub fn make_error(msg: &str) -> RttDashError {
    return RttDashError::Other(msg.to_string());
}

impl std::fmt::Display for RttDashError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            RttDashError::ContextError(ref err) => {
                return write!(f, "{:#}", err);
            },
            RttDashError::GpioError(ref err) => {
                return write!(f, "GPIO Error: {}", err);
            },
            RttDashError::HttpError(ref err) => {
                return write!(f, "HTTP Error: {}", err);
            },
            RttDashError::I2cError(ref err) => {
                return write!(f, "I2C Error: {}", err);
            },
            RttDashError::IoError(ref err) => {
                return write!(f, "IO Error: {}", err);
            },
            RttDashError::JsonError(ref err) => {
                return write!(f, "JSON Error: {}", err);
            },
            RttDashError::LoggerError(ref err) => {
                return write!(f, "Logger Error: {}", err);
            },
            RttDashError::SpiError(ref err) => {
                return write!(f, "SPI Error: {}", err);
            },
            RttDashError::Other(ref msg) => {
                return write!(f, "{}", msg);
            },
        }
    }
}

impl std::error::Error for RttDashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            RttDashError::ContextError(ref err) => Some(&**err),
            RttDashError::GpioError(ref err) => Some(err),
            RttDashError::HttpError(ref err) => Some(err),
            RttDashError::I2cError(ref err) => Some(err),
            RttDashError::IoError(ref err) => Some(err),
            RttDashError::JsonError(ref err) => Some(err),
            RttDashError::LoggerError(ref err) => Some(err),
            RttDashError::SpiError(ref err) => Some(err),
            RttDashError::Other(_) => None,
        }
    }
}

impl From<anyhow::Error> for RttDashError {
    fn from(err: anyhow::Error) -> RttDashError {
        return RttDashError::ContextError(err);
    }
}

impl From<rppal::gpio::Error> for RttDashError {
    fn from(err: rppal::gpio::Error) -> RttDashError {
        return RttDashError::GpioError(err);
    }
}

impl From<reqwest::Error> for RttDashError {
    fn from(err: reqwest::Error) -> RttDashError {
        return RttDashError::HttpError(err);
    }
}

impl From<rppal::i2c::Error> for RttDashError {
    fn from(err: rppal::i2c::Error) -> RttDashError {
        return RttDashError::I2cError(err);
    }
}

impl From<std::io::Error> for RttDashError {
    fn from(err: std::io::Error) -> RttDashError {
        return RttDashError::IoError(err);
    }
}

impl From<serde_json::Error> for RttDashError {
    fn from(err: serde_json::Error) -> RttDashError {
        return RttDashError::JsonError(err);
    }
}

impl From<flexi_logger::FlexiLoggerError> for RttDashError {
    fn from(err: flexi_logger::FlexiLoggerError) -> RttDashError {
        return RttDashError::LoggerError(err);
    }
}

impl From<rppal::spi::Error> for RttDashError {
    fn from(err: rppal::spi::Error) -> RttDashError {
        return RttDashError::SpiError(err);
    }
}
